// Source: https://api.coinpaprika.com/v1
use serde::Deserialize;

use crate::market_data::normaliser::lenient_f64;

// GET /search?q=..&c=currencies&limit=..
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub currencies: Vec<Currency>,
}

#[derive(Debug, Deserialize)]
pub struct Currency {
    pub id: String, // e.g. "btc-bitcoin"
    pub name: String,
    pub symbol: String,
}

// GET /tickers/{id}
#[derive(Debug, Deserialize)]
pub struct Ticker {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default, with = "lenient_f64")]
    pub circulating_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub total_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub quotes: Quotes,
}

#[derive(Debug, Default, Deserialize)]
pub struct Quotes {
    #[serde(rename = "USD", default)]
    pub usd: Option<UsdQuote>,
}

#[derive(Debug, Deserialize)]
pub struct UsdQuote {
    #[serde(default, with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub volume_24h: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub percent_change_24h: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub percent_change_7d: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub ath_price: Option<f64>,
    #[serde(default)]
    pub ath_date: Option<String>,
}
