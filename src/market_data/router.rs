//! Aggregation engine: routes a query across providers.
//!
//! * `price` / `info` walk an ordered chain and stop at the first provider
//!   that answers. Address-like queries go to the DEX chain; everything else
//!   to a symbol chain. Price and info have separate symbol chains (speed vs
//!   metadata richness).
//! * `search` fans out to every search-capable provider at once, waits for all
//!   of them to settle and merges the hits, first occurrence of a symbol wins.
//!
//! A provider that panics is treated like one that found nothing.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use itertools::Itertools;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::{Endpoints, Settings};
use crate::error::ProviderResult;
use crate::market_data::adapters::{
    Binance, CoinCap, CoinGecko, Coinpaprika, CryptoCompare, DexScreener, GeckoTerminal, Provider,
};
use crate::market_data::classifier::{classify, QueryKind};
use crate::market_data::http::{build_client, HttpClient};
use crate::market_data::reports::Reports;
use crate::market_data::types::{PriceRecord, SearchMatch, TokenInfoRecord};
use crate::telemetry::{self, Outcome};

pub type SharedProvider = Arc<dyn Provider>;

/// Ordered provider lists, one per routing decision.
#[derive(Clone, Default)]
pub struct Routes {
    /// address-like queries, price and info alike
    pub address: Vec<SharedProvider>,
    /// symbol queries for `price`, fastest first
    pub price_symbol: Vec<SharedProvider>,
    /// symbol queries for `info`, richest metadata first
    pub info_symbol: Vec<SharedProvider>,
    /// `search` fan-out set, in merge priority order
    pub search: Vec<SharedProvider>,
}

/// The default vendor set, built from one shared HTTP client.
pub struct DefaultProviders {
    client: Client,
    endpoints: Endpoints,
    pub binance: Arc<Binance>,
    pub coincap: Arc<CoinCap>,
    pub coingecko: Arc<CoinGecko>,
    pub coinpaprika: Arc<Coinpaprika>,
    pub cryptocompare: Arc<CryptoCompare>,
    pub dexscreener: Arc<DexScreener>,
    pub geckoterminal: Arc<GeckoTerminal>,
}

impl DefaultProviders {
    pub fn new(settings: &Settings) -> ProviderResult<Self> {
        let client = build_client(&settings.http)?;
        let ep = &settings.endpoints;
        let limit = settings.search_limit;
        let http = |base: &str| HttpClient::new(client.clone(), base);
        Ok(Self {
            client: client.clone(),
            endpoints: ep.clone(),
            binance: Arc::new(Binance::new(http(&ep.binance))),
            coincap: Arc::new(CoinCap::new(http(&ep.coincap)).with_search_limit(limit)),
            coingecko: Arc::new(CoinGecko::new(http(&ep.coingecko)).with_search_limit(limit)),
            coinpaprika: Arc::new(Coinpaprika::new(http(&ep.coinpaprika)).with_search_limit(limit)),
            cryptocompare: Arc::new(CryptoCompare::new(http(&ep.cryptocompare))),
            dexscreener: Arc::new(DexScreener::new(http(&ep.dexscreener)).with_search_limit(limit)),
            geckoterminal: Arc::new(GeckoTerminal::new(http(&ep.geckoterminal)).with_search_limit(limit)),
        })
    }

    /// Single-call reports sharing the same client and CoinGecko adapter.
    pub fn reports(&self) -> Reports {
        Reports::new(
            Arc::clone(&self.coingecko),
            HttpClient::new(self.client.clone(), &self.endpoints.fear_greed),
            HttpClient::new(self.client.clone(), &self.endpoints.etherscan),
        )
    }

    /// The fixed default orders.
    pub fn routes(&self) -> Routes {
        let p = |x: &SharedProvider| Arc::clone(x);
        let binance: SharedProvider = self.binance.clone();
        let coincap: SharedProvider = self.coincap.clone();
        let coingecko: SharedProvider = self.coingecko.clone();
        let coinpaprika: SharedProvider = self.coinpaprika.clone();
        let cryptocompare: SharedProvider = self.cryptocompare.clone();
        let dexscreener: SharedProvider = self.dexscreener.clone();
        let geckoterminal: SharedProvider = self.geckoterminal.clone();

        Routes {
            address: vec![p(&dexscreener), p(&geckoterminal)],
            price_symbol: vec![
                p(&binance),
                p(&coincap),
                p(&coingecko),
                p(&coinpaprika),
                p(&cryptocompare),
            ],
            info_symbol: vec![
                p(&coingecko),
                p(&coinpaprika),
                p(&coincap),
                p(&binance),
                p(&cryptocompare),
            ],
            search: vec![coingecko, dexscreener, coinpaprika, coincap],
        }
    }
}

impl Routes {
    pub fn defaults(settings: &Settings) -> ProviderResult<Self> {
        Ok(DefaultProviders::new(settings)?.routes())
    }

    /// Derive every route from one caller-ordered list by capability,
    /// preserving the caller's order.
    pub fn from_providers(providers: Vec<SharedProvider>) -> Self {
        let pick = |f: fn(&SharedProvider) -> bool| -> Vec<SharedProvider> {
            providers.iter().filter(|p| f(p)).cloned().collect()
        };
        let symbols = pick(|p| p.capabilities().symbols);
        Self {
            address: pick(|p| p.capabilities().addresses),
            price_symbol: symbols.clone(),
            info_symbol: symbols,
            search: pick(|p| p.capabilities().search),
        }
    }
}

pub struct Aggregator {
    routes: Routes,
}

impl Aggregator {
    pub fn new(routes: Routes) -> Self {
        Self { routes }
    }

    /// Default vendors in the default order.
    pub fn with_defaults(settings: &Settings) -> ProviderResult<Self> {
        Ok(Self::new(Routes::defaults(settings)?))
    }

    /// Caller-supplied providers replace the default set.
    pub fn with_providers(providers: Vec<SharedProvider>) -> Self {
        Self::new(Routes::from_providers(providers))
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn price(&self, query: &str, network: Option<&str>) -> Option<PriceRecord> {
        // classify before trimming: padding counts toward the length rule
        let kind = classify(query);
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let chain = match kind {
            QueryKind::Address => &self.routes.address,
            QueryKind::Symbol => &self.routes.price_symbol,
        };
        first_hit(chain, network, "price", |p| p.price(query, network)).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn info(&self, query: &str, network: Option<&str>) -> Option<TokenInfoRecord> {
        // classify before trimming: padding counts toward the length rule
        let kind = classify(query);
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let chain = match kind {
            QueryKind::Address => &self.routes.address,
            QueryKind::Symbol => &self.routes.info_symbol,
        };
        first_hit(chain, network, "token_info", |p| p.token_info(query, network)).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str) -> Vec<SearchMatch> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let calls = self.routes.search.iter().map(|p| {
            AssertUnwindSafe(p.search(query))
                .catch_unwind()
                .map(move |res| (p.name(), res))
        });

        // settle-all: every call runs to completion, none cancels another
        let settled = join_all(calls).await;

        let mut combined = Vec::new();
        for (name, res) in settled {
            match res {
                Ok(hits) => {
                    debug!(provider = name, hits = hits.len(), "search settled");
                    combined.extend(hits);
                }
                Err(_) => {
                    warn!(provider = name, "search panicked, omitting");
                    telemetry::record_call(name, "search", Outcome::Panic);
                }
            }
        }
        dedup_by_symbol(combined)
    }
}

/// Walk `chain` in order and return the first answer. Providers that need a
/// network are skipped when none was given.
async fn first_hit<'a, T>(
    chain: &'a [SharedProvider],
    network: Option<&str>,
    op: &'static str,
    mut call: impl FnMut(&'a dyn Provider) -> BoxFuture<'a, Option<T>>,
) -> Option<T> {
    for provider in chain {
        let provider: &'a dyn Provider = provider.as_ref();
        let name = provider.name();
        if provider.capabilities().needs_network && network.is_none() {
            debug!(provider = name, op, "skipped, needs a network");
            continue;
        }
        match AssertUnwindSafe(call(provider)).catch_unwind().await {
            Ok(Some(value)) => {
                info!(provider = name, op, "answered");
                return Some(value);
            }
            Ok(None) => debug!(provider = name, op, "no result, trying next"),
            Err(_) => {
                warn!(provider = name, op, "provider panicked, trying next");
                telemetry::record_call(name, op, Outcome::Panic);
            }
        }
    }
    None
}

/// Keep the first match for each symbol; input order is priority order.
pub fn dedup_by_symbol(matches: Vec<SearchMatch>) -> Vec<SearchMatch> {
    matches.into_iter().unique_by(|m| m.symbol.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn m(symbol: &str, source: &str) -> SearchMatch {
        SearchMatch::new(format!("{} on {}", symbol, source), symbol, source)
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let merged = dedup_by_symbol(vec![
            m("DOGE", "A"),
            m("SHIB", "A"),
            m("DOGE", "B"),
            m("FLOKI", "B"),
        ]);
        let got: Vec<_> = merged.iter().map(|x| (x.symbol.as_str(), x.source.as_str())).collect();
        assert_eq!(got, vec![("DOGE", "A"), ("SHIB", "A"), ("FLOKI", "B")]);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup_by_symbol(Vec::new()).is_empty());
    }

    #[test]
    fn test_default_routes_order() {
        let routes = Routes::defaults(&Settings::default()).unwrap();
        let names = |v: &[SharedProvider]| v.iter().map(|p| p.name().to_string()).collect::<Vec<_>>();
        assert_eq!(names(&routes.address), ["DexScreener", "GeckoTerminal"]);
        assert_eq!(
            names(&routes.price_symbol),
            ["Binance", "CoinCap", "CoinGecko", "Coinpaprika", "CryptoCompare"]
        );
        assert_eq!(
            names(&routes.info_symbol),
            ["CoinGecko", "Coinpaprika", "CoinCap", "Binance", "CryptoCompare"]
        );
        assert_eq!(names(&routes.search), ["CoinGecko", "DexScreener", "Coinpaprika", "CoinCap"]);
    }

    #[test]
    fn test_from_providers_filters_by_capability() {
        let d = DefaultProviders::new(&Settings::default()).unwrap();
        let list: Vec<SharedProvider> = vec![
            d.geckoterminal.clone() as SharedProvider,
            d.binance.clone() as SharedProvider,
            d.coingecko.clone() as SharedProvider,
        ];
        let routes = Routes::from_providers(list);
        assert_eq!(routes.address.len(), 1);
        assert_eq!(routes.address[0].name(), "GeckoTerminal");
        assert_eq!(routes.price_symbol.len(), 2);
        assert_eq!(routes.price_symbol[0].name(), "Binance");
        assert_eq!(routes.search.len(), 1);
        assert_eq!(routes.search[0].name(), "CoinGecko");
    }

    proptest! {
        #[test]
        fn prop_dedup_has_unique_symbols_and_keeps_order(
            symbols in proptest::collection::vec("[A-D]{1,2}", 0..40)
        ) {
            let input: Vec<SearchMatch> = symbols
                .iter()
                .enumerate()
                .map(|(i, s)| m(s, &i.to_string()))
                .collect();
            let out = dedup_by_symbol(input.clone());

            let mut seen = std::collections::HashSet::new();
            for x in &out {
                prop_assert!(seen.insert(x.symbol.clone()));
            }
            // every survivor is the earliest entry with its symbol
            for x in &out {
                let first = input.iter().find(|y| y.symbol == x.symbol).unwrap();
                prop_assert_eq!(first, x);
            }
            prop_assert_eq!(seen.len(), symbols.iter().collect::<std::collections::HashSet<_>>().len());
        }
    }
}
