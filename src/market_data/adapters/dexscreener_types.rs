// Source: https://api.dexscreener.com/latest/dex (search, tokens/{address})
use serde::Deserialize;

use crate::market_data::normaliser::lenient_f64;

#[derive(Debug, Deserialize)]
pub struct PairsResponse {
    #[serde(default)]
    pub pairs: Option<Vec<Pair>>, // null when the token is unknown
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub chain_id: String,
    pub dex_id: String,
    #[serde(default)]
    pub url: Option<String>,
    pub pair_address: String,
    pub base_token: PairToken,
    pub quote_token: PairToken,
    #[serde(default, with = "lenient_f64")]
    pub price_usd: Option<f64>, // decimal string on the wire
    #[serde(default)]
    pub volume: Option<Window>,
    #[serde(default)]
    pub price_change: Option<Window>,
    #[serde(default)]
    pub liquidity: Option<Liquidity>,
    #[serde(default, with = "lenient_f64")]
    pub fdv: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub info: Option<PairInfo>,
}

#[derive(Debug, Deserialize)]
pub struct PairToken {
    pub address: String,
    pub name: String,
    pub symbol: String,
}

// rolling windows keyed m5/h1/h6/h24; only h24 is used
#[derive(Debug, Deserialize)]
pub struct Window {
    #[serde(default, with = "lenient_f64")]
    pub h24: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Liquidity {
    #[serde(default, with = "lenient_f64")]
    pub usd: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PairInfo {
    #[serde(default)]
    pub websites: Vec<Website>,
    #[serde(default)]
    pub socials: Vec<Social>,
}

#[derive(Debug, Deserialize)]
pub struct Website {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Social {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}
