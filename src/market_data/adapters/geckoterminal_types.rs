// Source: https://api.geckoterminal.com/api/v2 (JSON:API style envelopes)
use serde::Deserialize;

use crate::market_data::normaliser::lenient_f64;

// GET /search/pools?query=..
#[derive(Debug, Deserialize)]
pub struct PoolList {
    #[serde(default)]
    pub data: Vec<Pool>,
}

#[derive(Debug, Deserialize)]
pub struct Pool {
    pub id: String, // "{network}_{pool address}"
    pub attributes: PoolAttributes,
    #[serde(default)]
    pub relationships: Option<PoolRelationships>,
}

#[derive(Debug, Deserialize)]
pub struct PoolAttributes {
    pub name: String, // "PEPE / WETH 0.3%"
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PoolRelationships {
    #[serde(default)]
    pub network: Option<Relation>,
}

#[derive(Debug, Deserialize)]
pub struct Relation {
    pub data: RelationData,
}

#[derive(Debug, Deserialize)]
pub struct RelationData {
    pub id: String,
}

// GET /networks/{network}/tokens/{address}
#[derive(Debug, Deserialize)]
pub struct TokenEnvelope {
    #[serde(default)]
    pub data: Option<Token>,
}

#[derive(Debug, Deserialize)]
pub struct Token {
    pub attributes: TokenAttributes,
}

#[derive(Debug, Deserialize)]
pub struct TokenAttributes {
    pub name: String,
    pub symbol: String,
    pub address: String,
    #[serde(default, with = "lenient_f64")]
    pub price_usd: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub fdv_usd: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub market_cap_usd: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub total_reserve_in_usd: Option<f64>,
    #[serde(default)]
    pub volume_usd: Option<Volume>,
}

#[derive(Debug, Deserialize)]
pub struct Volume {
    #[serde(default, with = "lenient_f64")]
    pub h24: Option<f64>,
}
