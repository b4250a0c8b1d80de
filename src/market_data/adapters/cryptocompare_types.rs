// Source: https://min-api.cryptocompare.com/data
use std::collections::HashMap;

use serde::Deserialize;

use crate::market_data::normaliser::lenient_f64;

// GET /price?fsym=BTC&tsyms=USD -> {"USD": 65000.1}
// errors come back as 200 with {"Response": "Error", "Message": ".."}
#[derive(Debug, Deserialize)]
pub struct PriceResponse {
    #[serde(rename = "USD", default, with = "lenient_f64")]
    pub usd: Option<f64>,
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
}

// GET /pricemultifull?fsyms=BTC&tsyms=USD -> {"RAW": {"BTC": {"USD": {...}}}}
#[derive(Debug, Deserialize)]
pub struct MultiFullResponse {
    #[serde(rename = "RAW", default)]
    pub raw: HashMap<String, HashMap<String, RawQuote>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct RawQuote {
    #[serde(default, with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub mktcap: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub supply: Option<f64>,
    #[serde(rename = "TOTALVOLUME24HTO", default, with = "lenient_f64")]
    pub total_volume_24h_to: Option<f64>,
    #[serde(rename = "CHANGE24HOUR", default, with = "lenient_f64")]
    pub change_24h: Option<f64>,
    #[serde(rename = "CHANGEPCT24HOUR", default, with = "lenient_f64")]
    pub change_pct_24h: Option<f64>,
}
