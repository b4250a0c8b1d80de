//! CoinGecko: the most metadata-rich symbol provider.
//!
//! Tickers are resolved to CoinGecko coin ids ("btc" -> "bitcoin") through the
//! search endpoint before hitting the price or detail endpoints. The same
//! resolution is reused by the chart report.

use async_trait::async_trait;

use super::coingecko_types::{CoinDetail, SearchResponse, SimplePrice};
use super::{find_match, settle, settle_search, Capabilities, Provider, DEFAULT_SEARCH_LIMIT};
use crate::error::{ProviderError, ProviderResult};
use crate::market_data::http::{segment, HttpClient};
use crate::market_data::normaliser;
use crate::market_data::types::{Links, PriceRecord, SearchMatch, TokenInfoRecord};

const NAME: &str = "CoinGecko";

pub struct CoinGecko {
    http: HttpClient,
    search_limit: usize,
}

/// A query resolved to a CoinGecko id, plus the symbol search reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCoin {
    pub id: String,
    pub symbol: Option<String>,
}

impl CoinGecko {
    pub fn new(http: HttpClient) -> Self {
        Self { http, search_limit: DEFAULT_SEARCH_LIMIT }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    async fn fetch_search(&self, query: &str) -> ProviderResult<Vec<SearchMatch>> {
        let resp: SearchResponse = self.http.get_json("/search", &[("query", query)]).await?;
        Ok(resp
            .coins
            .into_iter()
            .take(self.search_limit)
            .map(|c| SearchMatch::new(c.name, c.symbol, NAME).with_id(c.id))
            .collect())
    }

    /// Ticker or id -> CoinGecko id. When search has no exact hit the
    /// lower-cased query is assumed to already be an id.
    pub async fn resolve(&self, query: &str) -> ResolvedCoin {
        let id = query.trim().to_lowercase();
        let hits = match self.fetch_search(&id).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::debug!(provider = NAME, error = %e, "id resolution failed");
                Vec::new()
            }
        };
        match find_match(&hits, &id) {
            Some(m) => ResolvedCoin {
                id: m.id.clone().unwrap_or(id),
                symbol: Some(m.symbol.clone()),
            },
            None => ResolvedCoin { id, symbol: None },
        }
    }

    async fn fetch_price(&self, query: &str) -> ProviderResult<PriceRecord> {
        let coin = self.resolve(query).await;
        let prices: SimplePrice = self
            .http
            .get_json("/simple/price", &[("ids", coin.id.as_str()), ("vs_currencies", "usd")])
            .await?;
        let price = prices
            .get(&coin.id)
            .and_then(|p| p.usd)
            .and_then(normaliser::non_negative)
            .ok_or_else(|| ProviderError::not_found(coin.id.clone()))?;
        let symbol = coin.symbol.unwrap_or_else(|| coin.id.clone());
        PriceRecord::new(symbol, price, NAME)
    }

    async fn fetch_info(&self, query: &str) -> ProviderResult<TokenInfoRecord> {
        let coin = self.resolve(query).await;
        let detail: CoinDetail = self
            .http
            .get_json(
                &format!("/coins/{}", segment(&coin.id)),
                &[
                    ("localization", "false"),
                    ("tickers", "false"),
                    ("market_data", "true"),
                    ("community_data", "false"),
                    ("developer_data", "false"),
                    ("sparkline", "false"),
                ],
            )
            .await?;
        detail_to_info(detail)
    }
}

fn detail_to_info(detail: CoinDetail) -> ProviderResult<TokenInfoRecord> {
    let md = detail.market_data.unwrap_or_default();
    let price = md
        .current_price
        .usd
        .and_then(normaliser::non_negative)
        .ok_or(ProviderError::InvalidField("market_data.current_price.usd"))?;

    let mut info = TokenInfoRecord::new(detail.name, detail.symbol, price, NAME)?;
    info.description = normaliser::non_empty(detail.description.and_then(|d| d.en));
    info.market_cap = md.market_cap.usd.and_then(normaliser::non_negative);
    info.market_cap_rank = detail.market_cap_rank;
    info.fdv = md.fully_diluted_valuation.usd.and_then(normaliser::non_negative);
    info.circulating_supply = md.circulating_supply.and_then(normaliser::non_negative);
    info.total_supply = md.total_supply.and_then(normaliser::non_negative);
    info.max_supply = md.max_supply.and_then(normaliser::non_negative);
    info.volume_24h = md.total_volume.usd.and_then(normaliser::non_negative);
    info.price_change_24h = md.price_change_24h;
    info.price_change_percentage_24h = md.price_change_percentage_24h;
    info.price_change_percentage_7d = md.price_change_percentage_7d;
    info.ath = md.ath.usd.and_then(normaliser::non_negative);
    info.ath_date = md.ath_date.usd.as_deref().and_then(normaliser::parse_timestamp);
    info.atl = md.atl.usd.and_then(normaliser::non_negative);
    info.atl_date = md.atl_date.usd.as_deref().and_then(normaliser::parse_timestamp);

    if let Some(links) = detail.links {
        info.links = Links {
            website: links.homepage.into_iter().find(|u| !u.trim().is_empty()),
            twitter: normaliser::non_empty(links.twitter_screen_name)
                .map(|h| format!("https://twitter.com/{}", h)),
            telegram: normaliser::non_empty(links.telegram_channel_identifier)
                .map(|h| format!("https://t.me/{}", h)),
            discord: links.chat_url.into_iter().find(|u| u.contains("discord")),
            github: links
                .repos_url
                .and_then(|r| r.github.into_iter().find(|u| !u.trim().is_empty())),
        };
    }
    Ok(info)
}

#[async_trait]
impl Provider for CoinGecko {
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
        settle(NAME, "price", self.fetch_price(query).await)
    }

    async fn token_info(&self, query: &str, _network: Option<&str>) -> Option<TokenInfoRecord> {
        settle(NAME, "token_info", self.fetch_info(query).await)
    }
}
