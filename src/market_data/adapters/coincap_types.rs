// Source: https://api.coincap.io/v2 (assets). Numbers arrive as decimal strings.
use serde::Deserialize;

use crate::market_data::normaliser::lenient_f64;

// GET /assets?search=..&limit=..
#[derive(Debug, Deserialize)]
pub struct AssetList {
    #[serde(default)]
    pub data: Vec<Asset>,
}

// GET /assets/{id}
#[derive(Debug, Deserialize)]
pub struct AssetEnvelope {
    #[serde(default)]
    pub data: Option<Asset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default, with = "lenient_f64")]
    pub supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub max_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub market_cap_usd: Option<f64>,
    #[serde(default, rename = "volumeUsd24Hr", with = "lenient_f64")]
    pub volume_usd_24h: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub price_usd: Option<f64>,
    #[serde(default, rename = "changePercent24Hr", with = "lenient_f64")]
    pub change_percent_24h: Option<f64>,
    #[serde(default)]
    pub explorer: Option<String>,
}
