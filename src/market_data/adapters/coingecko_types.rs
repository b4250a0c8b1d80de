// Source: https://api.coingecko.com/api/v3 (public, keyless)
use std::collections::HashMap;

use serde::Deserialize;

use crate::market_data::normaliser::lenient_f64;

// GET /search?query=..
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
pub struct SearchCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
}

// GET /simple/price?ids=..&vs_currencies=usd -> { "bitcoin": { "usd": 65000.0 } }
pub type SimplePrice = HashMap<String, UsdValue>;

#[derive(Debug, Default, Deserialize)]
pub struct UsdValue {
    #[serde(default, with = "lenient_f64")]
    pub usd: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UsdDate {
    #[serde(default)]
    pub usd: Option<String>,
}

// GET /coins/{id}?market_data=true&...
#[derive(Debug, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub market_data: Option<MarketData>,
    #[serde(default)]
    pub links: Option<CoinLinks>,
}

#[derive(Debug, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: UsdValue,
    #[serde(default)]
    pub market_cap: UsdValue,
    #[serde(default)]
    pub fully_diluted_valuation: UsdValue,
    #[serde(default)]
    pub total_volume: UsdValue,
    #[serde(default, with = "lenient_f64")]
    pub circulating_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub total_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub max_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub price_change_24h: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub ath: UsdValue,
    #[serde(default)]
    pub ath_date: UsdDate,
    #[serde(default)]
    pub atl: UsdValue,
    #[serde(default)]
    pub atl_date: UsdDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoinLinks {
    #[serde(default)]
    pub homepage: Vec<String>,
    #[serde(default)]
    pub twitter_screen_name: Option<String>,
    #[serde(default)]
    pub telegram_channel_identifier: Option<String>,
    #[serde(default)]
    pub chat_url: Vec<String>,
    #[serde(default)]
    pub repos_url: Option<Repos>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Repos {
    #[serde(default)]
    pub github: Vec<String>,
}

// GET /global
#[derive(Debug, Deserialize)]
pub struct GlobalEnvelope {
    pub data: GlobalData,
}

#[derive(Debug, Deserialize)]
pub struct GlobalData {
    pub active_cryptocurrencies: u64,
    pub total_market_cap: HashMap<String, f64>,
    pub total_volume: HashMap<String, f64>,
    pub market_cap_percentage: HashMap<String, f64>,
    pub updated_at: i64, // unix seconds
}

// GET /search/trending
#[derive(Debug, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub coins: Vec<TrendingEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingEntry {
    pub item: TrendingItem,
}

#[derive(Debug, Deserialize)]
pub struct TrendingItem {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub data: Option<TrendingData>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingData {
    #[serde(default, with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: Option<String>, // preformatted, e.g. "$1,234,567"
}

// GET /coins/markets?vs_currency=usd&order=market_cap_desc
#[derive(Debug, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default, with = "lenient_f64")]
    pub current_price: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub total_volume: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub price_change_percentage_24h: Option<f64>,
}

// GET /coins/{id}/market_chart?vs_currency=usd&days=N -> [[ms, price], ...]
#[derive(Debug, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<(f64, Option<f64>)>,
}
