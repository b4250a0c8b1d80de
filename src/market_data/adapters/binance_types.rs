// Source: https://api.binance.com/api/v3 (Market Data endpoints)
use serde::Deserialize;

// GET /ticker/price?symbol=BTCUSDT
#[derive(Debug, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String, // decimal string, e.g. "65000.01000000"
}

// GET /ticker/24hr?symbol=BTCUSDT
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub last_price: String,
    #[serde(default)]
    pub price_change: Option<String>,
    #[serde(default)]
    pub price_change_percent: Option<String>,
    #[serde(default)]
    pub quote_volume: Option<String>, // in the quote asset (USDT ~ USD)
}
