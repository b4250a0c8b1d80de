// Wire shapes for the non-CoinGecko report endpoints.
use serde::Deserialize;

// GET https://api.alternative.me/fng/?limit=1
#[derive(Debug, Deserialize)]
pub struct FearGreedResponse {
    #[serde(default)]
    pub data: Vec<FearGreedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct FearGreedEntry {
    pub value: String,
    pub value_classification: String,
    pub timestamp: String, // unix seconds, as a string
}

// GET https://api.etherscan.io/api?module=gastracker&action=gasoracle
//
// On failure `status` is "0" and `result` is an error string, so the result
// is decoded only after the status check.
#[derive(Debug, Deserialize)]
pub struct EtherscanResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GasResult {
    pub safe_gas_price: String,
    pub propose_gas_price: String,
    pub fast_gas_price: String,
    #[serde(default, rename = "suggestBaseFee")]
    pub suggest_base_fee: Option<String>,
}
