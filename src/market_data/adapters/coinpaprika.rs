// Coinpaprika tickers. Ids look like "btc-bitcoin"; anything without a dash is
// treated as a ticker and resolved through search first.

use async_trait::async_trait;

use super::coinpaprika_types::{SearchResponse, Ticker};
use super::{find_match, settle, settle_search, Capabilities, Provider, DEFAULT_SEARCH_LIMIT};
use crate::error::{ProviderError, ProviderResult};
use crate::market_data::http::{segment, HttpClient};
use crate::market_data::normaliser;
use crate::market_data::types::{PriceRecord, SearchMatch, TokenInfoRecord};

const NAME: &str = "Coinpaprika";

pub struct Coinpaprika {
    http: HttpClient,
    search_limit: usize,
}

impl Coinpaprika {
    pub fn new(http: HttpClient) -> Self {
        Self { http, search_limit: DEFAULT_SEARCH_LIMIT }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    async fn fetch_search(&self, query: &str) -> ProviderResult<Vec<SearchMatch>> {
        let limit = self.search_limit.to_string();
        let resp: SearchResponse = self
            .http
            .get_json("/search", &[("q", query), ("c", "currencies"), ("limit", limit.as_str())])
            .await?;
        Ok(resp
            .currencies
            .into_iter()
            .take(self.search_limit)
            .map(|c| SearchMatch::new(c.name, c.symbol, NAME).with_id(c.id))
            .collect())
    }

    /// Exact symbol/id hit first, then the top search hit, then the query itself.
    async fn resolve_id(&self, query: &str) -> String {
        let id = query.trim().to_lowercase();
        if id.contains('-') {
            return id;
        }
        let hits = self.fetch_search(&id).await.unwrap_or_default();
        find_match(&hits, &id)
            .or_else(|| hits.first())
            .and_then(|m| m.id.clone())
            .unwrap_or(id)
    }

    async fn fetch_info(&self, query: &str) -> ProviderResult<TokenInfoRecord> {
        let id = self.resolve_id(query).await;
        let ticker: Ticker = self.http.get_json(&format!("/tickers/{}", segment(&id)), &[]).await?;
        ticker_to_info(ticker)
    }
}

fn ticker_to_info(ticker: Ticker) -> ProviderResult<TokenInfoRecord> {
    let quote = ticker.quotes.usd.ok_or(ProviderError::InvalidField("quotes.USD"))?;
    let price = quote
        .price
        .and_then(normaliser::non_negative)
        .ok_or(ProviderError::InvalidField("quotes.USD.price"))?;

    let mut info = TokenInfoRecord::new(ticker.name, ticker.symbol, price, NAME)?;
    info.market_cap = quote.market_cap.and_then(normaliser::non_negative);
    info.market_cap_rank = ticker.rank.filter(|r| *r > 0);
    info.circulating_supply = ticker.circulating_supply.and_then(normaliser::non_negative);
    info.total_supply = ticker.total_supply.and_then(normaliser::non_negative);
    // paprika reports 0 for "no cap"
    info.max_supply = ticker.max_supply.filter(|s| *s > 0.0);
    info.volume_24h = quote.volume_24h.and_then(normaliser::non_negative);
    info.price_change_percentage_24h = quote.percent_change_24h;
    info.price_change_percentage_7d = quote.percent_change_7d;
    info.ath = quote.ath_price.and_then(normaliser::non_negative);
    info.ath_date = quote.ath_date.as_deref().and_then(normaliser::parse_timestamp);
    Ok(info)
}

#[async_trait]
impl Provider for Coinpaprika {
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
