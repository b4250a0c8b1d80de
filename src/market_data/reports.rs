//! Auxiliary single-endpoint reports: global market snapshot, trending coins,
//! top coins by market cap, fear & greed sentiment, Ethereum gas and a
//! historical price chart.
//!
//! No fallback or merge here. Each report is one call that resolves to a value
//! or "nothing", through the same `settle` path the adapters use.

use std::sync::Arc;

use crate::error::{ProviderError, ProviderResult};
use crate::market_data::adapters::coingecko_types::{
    GlobalEnvelope, MarketChart, MarketCoin, TrendingResponse,
};
use crate::market_data::adapters::{settle, CoinGecko};
use crate::market_data::http::{segment, HttpClient};
use crate::market_data::normaliser;
use crate::market_data::reports_types::{EtherscanResponse, FearGreedResponse, GasResult};
use crate::market_data::types::{
    GasOracle, GlobalMarket, PriceChart, Sentiment, TopCoin, TrendingCoin,
};

pub const TRENDING_LIMIT: usize = 10;
pub const TOP_LIMIT: usize = 50;
pub const DEFAULT_CHART_DAYS: u32 = 7;

const FEAR_GREED: &str = "Alternative.me";
const ETHERSCAN: &str = "Etherscan";

pub struct Reports {
    coingecko: Arc<CoinGecko>,
    fear_greed: HttpClient,
    etherscan: HttpClient,
}

impl Reports {
    pub fn new(coingecko: Arc<CoinGecko>, fear_greed: HttpClient, etherscan: HttpClient) -> Self {
        Self { coingecko, fear_greed, etherscan }
    }

    pub async fn market(&self) -> Option<GlobalMarket> {
        settle("CoinGecko", "market", self.fetch_market().await)
    }

    pub async fn trending(&self) -> Vec<TrendingCoin> {
        settle("CoinGecko", "trending", self.fetch_trending().await).unwrap_or_default()
    }

    pub async fn top(&self) -> Vec<TopCoin> {
        settle("CoinGecko", "top", self.fetch_top().await).unwrap_or_default()
    }

    pub async fn sentiment(&self) -> Option<Sentiment> {
        settle(FEAR_GREED, "sentiment", self.fetch_sentiment().await)
    }

    pub async fn gas(&self) -> Option<GasOracle> {
        settle(ETHERSCAN, "gas", self.fetch_gas().await)
    }

    /// USD price history for a ticker or CoinGecko id over `days` days.
    pub async fn chart(&self, query: &str, days: u32) -> Option<PriceChart> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        settle("CoinGecko", "chart", self.fetch_chart(query, days).await)
    }

    async fn fetch_market(&self) -> ProviderResult<GlobalMarket> {
        let env: GlobalEnvelope = self.coingecko.http().get_json("/global", &[]).await?;
        global_to_market(env)
    }

    async fn fetch_trending(&self) -> ProviderResult<Vec<TrendingCoin>> {
        let resp: TrendingResponse = self.coingecko.http().get_json("/search/trending", &[]).await?;
        Ok(trending_coins(resp))
    }

    async fn fetch_top(&self) -> ProviderResult<Vec<TopCoin>> {
        let per_page = TOP_LIMIT.to_string();
        let coins: Vec<MarketCoin> = self
            .coingecko
            .http()
            .get_json(
                "/coins/markets",
                &[
                    ("vs_currency", "usd"),
                    ("order", "market_cap_desc"),
                    ("per_page", per_page.as_str()),
                    ("page", "1"),
                    ("sparkline", "false"),
                ],
            )
            .await?;
        Ok(coins.into_iter().take(TOP_LIMIT).map(top_coin).collect())
    }

    async fn fetch_sentiment(&self) -> ProviderResult<Sentiment> {
        let resp: FearGreedResponse = self.fear_greed.get_json("/fng/", &[("limit", "1")]).await?;
        fear_greed_to_sentiment(resp)
    }

    async fn fetch_gas(&self) -> ProviderResult<GasOracle> {
        let resp: EtherscanResponse = self
            .etherscan
            .get_json("/api", &[("module", "gastracker"), ("action", "gasoracle")])
            .await?;
        etherscan_to_gas(resp)
    }

    async fn fetch_chart(&self, query: &str, days: u32) -> ProviderResult<PriceChart> {
        let coin = self.coingecko.resolve(query).await;
        let days = days.max(1).to_string();
        let chart: MarketChart = self
            .coingecko
            .http()
            .get_json(
                &format!("/coins/{}/market_chart", segment(&coin.id)),
                &[("vs_currency", "usd"), ("days", days.as_str())],
            )
            .await?;
        chart_from_wire(coin.id, chart)
    }
}

fn global_to_market(env: GlobalEnvelope) -> ProviderResult<GlobalMarket> {
    let d = env.data;
    let usd = |m: &std::collections::HashMap<String, f64>, key: &'static str, field: &'static str| {
        m.get(key).copied().and_then(normaliser::non_negative).ok_or(ProviderError::InvalidField(field))
    };
    Ok(GlobalMarket {
        total_market_cap_usd: usd(&d.total_market_cap, "usd", "total_market_cap.usd")?,
        total_volume_24h_usd: usd(&d.total_volume, "usd", "total_volume.usd")?,
        bitcoin_dominance_percentage: usd(&d.market_cap_percentage, "btc", "market_cap_percentage.btc")?,
        ethereum_dominance_percentage: usd(&d.market_cap_percentage, "eth", "market_cap_percentage.eth")?,
        active_cryptocurrencies: d.active_cryptocurrencies,
        last_updated: normaliser::timestamp_secs(d.updated_at)
            .ok_or(ProviderError::InvalidField("updated_at"))?,
    })
}

fn trending_coins(resp: TrendingResponse) -> Vec<TrendingCoin> {
    resp.coins
        .into_iter()
        .take(TRENDING_LIMIT)
        .map(|entry| {
            let item = entry.item;
            let data = item.data;
            TrendingCoin {
                id: item.id,
                name: item.name,
                symbol: normaliser::symbol(&item.symbol),
                market_cap_rank: item.market_cap_rank,
                price_usd: data.as_ref().and_then(|d| d.price).and_then(normaliser::non_negative),
                price_change_24h: data
                    .as_ref()
                    .and_then(|d| d.price_change_percentage_24h.get("usd").copied())
                    .and_then(normaliser::finite),
                volume_24h: data.and_then(|d| normaliser::non_empty(d.total_volume)),
            }
        })
        .collect()
}

fn top_coin(c: MarketCoin) -> TopCoin {
    TopCoin {
        id: c.id,
        name: c.name,
        symbol: normaliser::symbol(&c.symbol),
        market_cap_rank: c.market_cap_rank,
        price_usd: c.current_price.and_then(normaliser::non_negative),
        market_cap: c.market_cap.and_then(normaliser::non_negative),
        volume_24h: c.total_volume.and_then(normaliser::non_negative),
        price_change_24h: c.price_change_percentage_24h,
    }
}

fn fear_greed_to_sentiment(resp: FearGreedResponse) -> ProviderResult<Sentiment> {
    let entry = resp
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::not_found("fear & greed index"))?;
    let value: u8 = entry
        .value
        .trim()
        .parse()
        .map_err(|_| ProviderError::InvalidField("data.value"))?;
    let last_updated = entry
        .timestamp
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(normaliser::timestamp_secs)
        .ok_or(ProviderError::InvalidField("data.timestamp"))?;
    Ok(Sentiment {
        value,
        classification: entry.value_classification,
        last_updated,
    })
}

fn etherscan_to_gas(resp: EtherscanResponse) -> ProviderResult<GasOracle> {
    if resp.status != "1" {
        return Err(ProviderError::not_found(format!("gas oracle: {}", resp.message)));
    }
    let result: GasResult = serde_json::from_value(resp.result)?;
    let gwei = |s: &str, field: &'static str| {
        normaliser::parse_price(s).ok_or(ProviderError::InvalidField(field))
    };
    Ok(GasOracle {
        network: "Ethereum".into(),
        low: gwei(&result.safe_gas_price, "SafeGasPrice")?,
        average: gwei(&result.propose_gas_price, "ProposeGasPrice")?,
        high: gwei(&result.fast_gas_price, "FastGasPrice")?,
        base_fee: result.suggest_base_fee.as_deref().and_then(normaliser::parse_price),
    })
}

fn chart_from_wire(coin_id: String, chart: MarketChart) -> ProviderResult<PriceChart> {
    // points with an unparseable timestamp or price are dropped, not zeroed
    let points = chart
        .prices
        .into_iter()
        .filter_map(|(ms, price)| {
            let at = normaliser::timestamp_millis(ms as i64)?;
            Some((at, price.and_then(normaliser::non_negative)?))
        })
        .collect();
    PriceChart::from_points(coin_id.clone(), points).ok_or_else(|| ProviderError::not_found(coin_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_to_market() {
        let env: GlobalEnvelope = serde_json::from_str(
            r#"{"data": {
                "active_cryptocurrencies": 14000,
                "total_market_cap": {"usd": 2.5e12, "eur": 2.3e12},
                "total_volume": {"usd": 9.0e10},
                "market_cap_percentage": {"btc": 52.1, "eth": 16.9},
                "updated_at": 1700000000
            }}"#,
        )
        .unwrap();
        let m = global_to_market(env).unwrap();
        assert_eq!(m.total_market_cap_usd, 2.5e12);
        assert_eq!(m.bitcoin_dominance_percentage, 52.1);
        assert_eq!(m.active_cryptocurrencies, 14000);
        assert_eq!(m.last_updated.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_trending_caps_and_uppercases() {
        let items: Vec<String> = (0..15)
            .map(|i| {
                format!(
                    r#"{{"item": {{"id": "c{i}", "name": "Coin {i}", "symbol": "c{i}",
                        "data": {{"price": "0.5", "price_change_percentage_24h": {{"usd": 3.2}},
                                  "total_volume": "$1,000"}}}}}}"#
                )
            })
            .collect();
        let resp: TrendingResponse =
            serde_json::from_str(&format!(r#"{{"coins": [{}]}}"#, items.join(","))).unwrap();
        let coins = trending_coins(resp);
        assert_eq!(coins.len(), TRENDING_LIMIT);
        assert_eq!(coins[0].symbol, "C0");
        assert_eq!(coins[0].price_usd, Some(0.5));
        assert_eq!(coins[0].price_change_24h, Some(3.2));
        assert_eq!(coins[0].volume_24h.as_deref(), Some("$1,000"));
    }

    #[test]
    fn test_fear_greed() {
        let resp: FearGreedResponse = serde_json::from_str(
            r#"{"name": "Fear and Greed Index", "data": [
                {"value": "72", "value_classification": "Greed", "timestamp": "1700000000"}
            ]}"#,
        )
        .unwrap();
        let s = fear_greed_to_sentiment(resp).unwrap();
        assert_eq!(s.value, 72);
        assert_eq!(s.classification, "Greed");

        let empty: FearGreedResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(fear_greed_to_sentiment(empty).is_err());
    }

    #[test]
    fn test_etherscan_status_checked_before_result() {
        let err: EtherscanResponse = serde_json::from_str(
            r#"{"status": "0", "message": "NOTOK", "result": "Missing/Invalid API Key"}"#,
        )
        .unwrap();
        assert!(matches!(etherscan_to_gas(err), Err(ProviderError::NotFound(_))));

        let ok: EtherscanResponse = serde_json::from_str(
            r#"{"status": "1", "message": "OK", "result": {
                "LastBlock": "19000000", "SafeGasPrice": "12", "ProposeGasPrice": "13",
                "FastGasPrice": "15", "suggestBaseFee": "11.52", "gasUsedRatio": "0.4"
            }}"#,
        )
        .unwrap();
        let gas = etherscan_to_gas(ok).unwrap();
        assert_eq!((gas.low, gas.average, gas.high), (12.0, 13.0, 15.0));
        assert_eq!(gas.base_fee, Some(11.52));
    }

    #[test]
    fn test_chart_min_max_and_empty() {
        let chart: MarketChart = serde_json::from_str(
            r#"{"prices": [[1700000000000, 100.0], [1700003600000, 90.5], [1700007200000, null], [1700010800000, 120.25]]}"#,
        )
        .unwrap();
        let c = chart_from_wire("bitcoin".into(), chart).unwrap();
        assert_eq!(c.points.len(), 3);
        assert_eq!(c.min_price, 90.5);
        assert_eq!(c.max_price, 120.25);

        let empty: MarketChart = serde_json::from_str(r#"{"prices": []}"#).unwrap();
        assert!(chart_from_wire("bitcoin".into(), empty).is_err());
    }
}
