// GeckoTerminal chain-indexed token scanner. Token lookups are per network
// ("eth", "bsc", "solana", ...), so it only answers when one is supplied.

use async_trait::async_trait;

use super::geckoterminal_types::{Pool, PoolList, TokenAttributes, TokenEnvelope};
use super::{settle, settle_search, Capabilities, Provider, DEFAULT_SEARCH_LIMIT};
use crate::error::{ProviderError, ProviderResult};
use crate::market_data::http::{segment, HttpClient};
use crate::market_data::normaliser;
use crate::market_data::types::{PriceRecord, SearchMatch, TokenInfoRecord};

const NAME: &str = "GeckoTerminal";

pub struct GeckoTerminal {
    http: HttpClient,
    search_limit: usize,
}

impl GeckoTerminal {
    pub fn new(http: HttpClient) -> Self {
        Self { http, search_limit: DEFAULT_SEARCH_LIMIT }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    async fn fetch_search(&self, query: &str) -> ProviderResult<Vec<SearchMatch>> {
        let list: PoolList = self.http.get_json("/search/pools", &[("query", query)]).await?;
        Ok(list.data.into_iter().take(self.search_limit).map(pool_match).collect())
    }

    async fn fetch_info(&self, address: &str, network: Option<&str>) -> ProviderResult<TokenInfoRecord> {
        let network = network
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ProviderError::InvalidField("network"))?;
        let path = format!("/networks/{}/tokens/{}", segment(network), segment(address));
        let env: TokenEnvelope = self.http.get_json(&path, &[]).await?;
        let token = env.data.ok_or_else(|| ProviderError::not_found(address.to_string()))?;
        token_to_info(token.attributes, network)
    }
}

/// Pools are named "BASE / QUOTE ..."; the base ticker is the match symbol.
fn pool_match(pool: Pool) -> SearchMatch {
    let base = pool
        .attributes
        .name
        .split(" / ")
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    let network = pool
        .relationships
        .and_then(|r| r.network)
        .map(|n| n.data.id);
    let m = SearchMatch::new(pool.attributes.name, base, NAME).with_id(pool.id);
    match network {
        Some(n) => m.with_network(n),
        None => m,
    }
}

fn token_to_info(attrs: TokenAttributes, network: &str) -> ProviderResult<TokenInfoRecord> {
    let price = attrs
        .price_usd
        .and_then(normaliser::non_negative)
        .ok_or(ProviderError::InvalidField("price_usd"))?;
    let mut info = TokenInfoRecord::new(attrs.name, attrs.symbol, price, NAME)?;
    info.address = Some(attrs.address);
    info.network = Some(network.to_string());
    info.fdv = attrs.fdv_usd.and_then(normaliser::non_negative);
    info.market_cap = attrs.market_cap_usd.and_then(normaliser::non_negative);
    info.liquidity_usd = attrs.total_reserve_in_usd.and_then(normaliser::non_negative);
    info.volume_24h = attrs.volume_usd.and_then(|v| v.h24).and_then(normaliser::non_negative);
    Ok(info)
}

#[async_trait]
impl Provider for GeckoTerminal {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::addresses().with_network()
    }

    async fn search(&self, query: &str) -> Vec<SearchMatch> {
        settle_search(NAME, self.fetch_search(query).await)
    }

    async fn price(&self, query: &str, network: Option<&str>) -> Option<PriceRecord> {
        let info = self.fetch_info(query, network).await;
        settle(NAME, "price", info.map(|i| i.to_price()))
    }

    async fn token_info(&self, query: &str, network: Option<&str>) -> Option<TokenInfoRecord> {
        settle(NAME, "token_info", self.fetch_info(query, network).await)
    }
}
