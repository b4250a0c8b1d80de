// Shared contract for vendor adapters.
//
// Adapters never fail outward: each trait method resolves to a value, `None`
// or an empty Vec. Internally they work in `ProviderResult` and hand the result
// to `settle`, which logs and counts it before collapsing it.

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::market_data::types::{PriceRecord, SearchMatch, TokenInfoRecord};
use crate::telemetry;

pub mod binance;
pub mod binance_types;
pub mod coincap;
pub mod coincap_types;
pub mod coingecko;
pub mod coingecko_types;
pub mod coinpaprika;
pub mod coinpaprika_types;
pub mod cryptocompare;
pub mod cryptocompare_types;
pub mod dexscreener;
pub mod dexscreener_types;
pub mod geckoterminal;
pub mod geckoterminal_types;

pub use binance::Binance;
pub use coincap::CoinCap;
pub use coingecko::CoinGecko;
pub use coinpaprika::Coinpaprika;
pub use cryptocompare::CryptoCompare;
pub use dexscreener::DexScreener;
pub use geckoterminal::GeckoTerminal;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// What a provider can usefully answer. The aggregator routes on these tags,
/// never on provider identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// has a real search endpoint worth fanning out to
    pub search: bool,
    /// answers ticker symbols / coin ids
    pub symbols: bool,
    /// answers on-chain contract addresses
    pub addresses: bool,
    /// address lookups need a network qualifier
    pub needs_network: bool,
}

impl Capabilities {
    pub const fn symbols() -> Self {
        Self { search: false, symbols: true, addresses: false, needs_network: false }
    }

    pub const fn addresses() -> Self {
        Self { search: false, symbols: false, addresses: true, needs_network: false }
    }

    pub const fn with_search(mut self) -> Self {
        self.search = true;
        self
    }

    pub const fn with_network(mut self) -> Self {
        self.needs_network = true;
        self
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable name, stamped as `source` on every record.
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Relevance-ordered matches, capped to the adapter's search limit.
    async fn search(&self, query: &str) -> Vec<SearchMatch>;

    async fn price(&self, query: &str, network: Option<&str>) -> Option<PriceRecord>;

    async fn token_info(&self, query: &str, network: Option<&str>) -> Option<TokenInfoRecord>;
}

/// Collapse an adapter-internal result into the "value or nothing" contract.
pub(crate) fn settle<T>(provider: &str, op: &'static str, result: ProviderResult<T>) -> Option<T> {
    match result {
        Ok(value) => {
            telemetry::record_call(provider, op, telemetry::Outcome::Hit);
            Some(value)
        }
        Err(e) if e.is_transient() => {
            tracing::warn!(provider, op, error = %e, "provider unavailable");
            telemetry::record_call(provider, op, telemetry::Outcome::Error);
            None
        }
        Err(e) => {
            tracing::debug!(provider, op, error = %e, "provider has no result");
            telemetry::record_call(provider, op, telemetry::Outcome::Miss);
            None
        }
    }
}

/// Same as [`settle`] for search, where "nothing" is an empty Vec.
pub(crate) fn settle_search(provider: &str, result: ProviderResult<Vec<SearchMatch>>) -> Vec<SearchMatch> {
    settle(provider, "search", result).unwrap_or_default()
}

/// Pick the search hit that names `query`, by symbol or vendor id.
pub(crate) fn find_match<'a>(matches: &'a [SearchMatch], query: &str) -> Option<&'a SearchMatch> {
    matches.iter().find(|m| m.is_match_for(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    #[test]
    fn test_settle_collapses_errors() {
        assert_eq!(settle("X", "price", Ok(5)), Some(5));
        assert_eq!(settle::<u8>("X", "price", Err(ProviderError::Timeout)), None);
        assert_eq!(settle::<u8>("X", "price", Err(ProviderError::not_found("btc"))), None);
        assert!(settle_search("X", Err(ProviderError::Status(500))).is_empty());
    }

    #[test]
    fn test_capability_builders() {
        let c = Capabilities::addresses().with_network();
        assert!(c.addresses && c.needs_network && !c.symbols && !c.search);
        let c = Capabilities::symbols().with_search();
        assert!(c.symbols && c.search && !c.addresses);
    }

    #[test]
    fn test_find_match() {
        let hits = vec![
            SearchMatch::new("Bitcoin Cash", "BCH", "A").with_id("bitcoin-cash"),
            SearchMatch::new("Bitcoin", "BTC", "A").with_id("bitcoin"),
        ];
        assert_eq!(find_match(&hits, "btc").and_then(|m| m.id.as_deref()), Some("bitcoin"));
        assert_eq!(find_match(&hits, "bitcoin-cash").map(|m| m.symbol.as_str()), Some("BCH"));
        assert!(find_match(&hits, "eth").is_none());
    }
}
