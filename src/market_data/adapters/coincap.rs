// CoinCap asset index. Resolves tickers to its own slug ids ("bitcoin") via search.

use async_trait::async_trait;

use super::coincap_types::{Asset, AssetEnvelope, AssetList};
use super::{find_match, settle, settle_search, Capabilities, Provider, DEFAULT_SEARCH_LIMIT};
use crate::error::{ProviderError, ProviderResult};
use crate::market_data::http::{segment, HttpClient};
use crate::market_data::normaliser;
use crate::market_data::types::{PriceRecord, SearchMatch, TokenInfoRecord};

const NAME: &str = "CoinCap";

pub struct CoinCap {
    http: HttpClient,
    search_limit: usize,
}

impl CoinCap {
    pub fn new(http: HttpClient) -> Self {
        Self { http, search_limit: DEFAULT_SEARCH_LIMIT }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    async fn fetch_search(&self, query: &str) -> ProviderResult<Vec<SearchMatch>> {
        let limit = self.search_limit.to_string();
        let list: AssetList = self
            .http
            .get_json("/assets", &[("search", query), ("limit", limit.as_str())])
            .await?;
        Ok(list
            .data
            .into_iter()
            .take(self.search_limit)
            .map(|a| SearchMatch::new(a.name, a.symbol, NAME).with_id(a.id))
            .collect())
    }

    /// Ticker or slug -> CoinCap slug. Falls back to the lower-cased query.
    async fn resolve_id(&self, query: &str) -> String {
        let id = query.trim().to_lowercase();
        let hits = self.fetch_search(&id).await.unwrap_or_default();
        find_match(&hits, &id)
            .and_then(|m| m.id.clone())
            .unwrap_or(id)
    }

    async fn fetch_asset(&self, query: &str) -> ProviderResult<Asset> {
        let id = self.resolve_id(query).await;
        let env: AssetEnvelope = self.http.get_json(&format!("/assets/{}", segment(&id)), &[]).await?;
        env.data.ok_or_else(|| ProviderError::not_found(id))
    }

    async fn fetch_info(&self, query: &str) -> ProviderResult<TokenInfoRecord> {
        let asset = self.fetch_asset(query).await?;
        asset_to_info(asset)
    }
}

fn asset_to_info(asset: Asset) -> ProviderResult<TokenInfoRecord> {
    let price = asset
        .price_usd
        .and_then(normaliser::non_negative)
        .ok_or(ProviderError::InvalidField("priceUsd"))?;
    let mut info = TokenInfoRecord::new(asset.name, asset.symbol, price, NAME)?;
    info.market_cap = asset.market_cap_usd.and_then(normaliser::non_negative);
    info.market_cap_rank = asset.rank.as_deref().and_then(|r| r.trim().parse().ok());
    info.circulating_supply = asset.supply.and_then(normaliser::non_negative);
    info.max_supply = asset.max_supply.and_then(normaliser::non_negative);
    info.volume_24h = asset.volume_usd_24h.and_then(normaliser::non_negative);
    info.price_change_percentage_24h = asset.change_percent_24h;
    info.links.website = normaliser::non_empty(asset.explorer);
    Ok(info)
}

#[async_trait]
impl Provider for CoinCap {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::symbols().with_search()
    }

    async fn search(&self, query: &str) -> Vec<SearchMatch> {
        settle_search(NAME, self.fetch_search(query).await)
    }

    async fn price(&self, query: &str, _network: Option<&str>) -> Option<PriceRecord> {
        let info = self.fetch_info(query).await;
        settle(NAME, "price", info.map(|i| i.to_price()))
    }

    async fn token_info(&self, query: &str, _network: Option<&str>) -> Option<TokenInfoRecord> {
        settle(NAME, "token_info", self.fetch_info(query).await)
    }
}
