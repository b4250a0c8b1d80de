// CryptoCompare min-api. Last resort for symbols; its coin list is too heavy
// to search, so `search` answers empty without a request.

use async_trait::async_trait;

use super::cryptocompare_types::{MultiFullResponse, PriceResponse};
use super::{settle, Capabilities, Provider};
use crate::error::{ProviderError, ProviderResult};
use crate::market_data::http::HttpClient;
use crate::market_data::normaliser;
use crate::market_data::types::{PriceRecord, SearchMatch, TokenInfoRecord};

const NAME: &str = "CryptoCompare";

pub struct CryptoCompare {
    http: HttpClient,
}

impl CryptoCompare {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    async fn fetch_price(&self, symbol: &str) -> ProviderResult<PriceRecord> {
        let sym = normaliser::symbol(symbol);
        let resp: PriceResponse = self
            .http
            .get_json("/price", &[("fsym", sym.as_str()), ("tsyms", "USD")])
            .await?;
        if resp.response.as_deref() == Some("Error") {
            return Err(ProviderError::not_found(sym));
        }
        let price = resp
            .usd
            .and_then(normaliser::non_negative)
            .ok_or(ProviderError::InvalidField("USD"))?;
        PriceRecord::new(sym, price, NAME)
    }

    async fn fetch_info(&self, symbol: &str) -> ProviderResult<TokenInfoRecord> {
        let sym = normaliser::symbol(symbol);
        let resp: MultiFullResponse = self
            .http
            .get_json("/pricemultifull", &[("fsyms", sym.as_str()), ("tsyms", "USD")])
            .await?;
        multifull_to_info(&sym, resp)
    }
}

fn multifull_to_info(sym: &str, mut resp: MultiFullResponse) -> ProviderResult<TokenInfoRecord> {
    let raw = resp
        .raw
        .remove(sym)
        .and_then(|mut quotes| quotes.remove("USD"))
        .ok_or_else(|| ProviderError::not_found(sym.to_string()))?;
    let price = raw
        .price
        .and_then(normaliser::non_negative)
        .ok_or(ProviderError::InvalidField("PRICE"))?;

    // this endpoint carries no display name
    let mut info = TokenInfoRecord::new(sym, sym, price, NAME)?;
    info.market_cap = raw.mktcap.and_then(normaliser::non_negative);
    info.circulating_supply = raw.supply.and_then(normaliser::non_negative);
    info.volume_24h = raw.total_volume_24h_to.and_then(normaliser::non_negative);
    info.price_change_24h = raw.change_24h;
    info.price_change_percentage_24h = raw.change_pct_24h;
    Ok(info)
}

#[async_trait]
impl Provider for CryptoCompare {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::symbols()
    }

    async fn search(&self, _query: &str) -> Vec<SearchMatch> {
        Vec::new()
    }

    async fn price(&self, query: &str, _network: Option<&str>) -> Option<PriceRecord> {
        settle(NAME, "price", self.fetch_price(query).await)
    }

    async fn token_info(&self, query: &str, _network: Option<&str>) -> Option<TokenInfoRecord> {
        settle(NAME, "token_info", self.fetch_info(query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multifull_to_info() {
        let resp: MultiFullResponse = serde_json::from_str(
            r#"{"RAW":{"BTC":{"USD":{"PRICE":65000.5,"MKTCAP":1.28e12,"SUPPLY":19700000,
                "TOTALVOLUME24HTO":2.5e10,"CHANGE24HOUR":-120.5,"CHANGEPCT24HOUR":-0.18}}}}"#,
        )
        .unwrap();
        let info = multifull_to_info("BTC", resp).unwrap();
        assert_eq!(info.name, "BTC");
        assert_eq!(info.price_usd(), 65000.5);
        assert_eq!(info.price_change_24h, Some(-120.5));
        assert_eq!(info.fdv, None);
    }

    #[test]
    fn test_multifull_missing_symbol() {
        let resp: MultiFullResponse = serde_json::from_str(r#"{"Response":"Error"}"#).unwrap();
        assert!(matches!(
            multifull_to_info("NOPE", resp),
            Err(ProviderError::NotFound(_))
        ));
    }
}
