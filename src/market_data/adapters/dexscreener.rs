//! DexScreener pair scanner: the first stop for contract addresses.
//!
//! A token lookup returns every pool the token trades in, most liquid first.
//! The first pool supplies the headline numbers; the top pools are kept as
//! [`DexPairRecord`]s. Works across chains, so no network qualifier is needed.

use async_trait::async_trait;

use super::dexscreener_types::{Pair, PairInfo, PairsResponse};
use super::{settle, settle_search, Capabilities, Provider, DEFAULT_SEARCH_LIMIT};
use crate::error::{ProviderError, ProviderResult};
use crate::market_data::http::{segment, HttpClient};
use crate::market_data::normaliser;
use crate::market_data::types::{DexPairRecord, Links, PriceRecord, SearchMatch, TokenInfoRecord};

const NAME: &str = "DexScreener";

pub struct DexScreener {
    http: HttpClient,
    search_limit: usize,
}

impl DexScreener {
    pub fn new(http: HttpClient) -> Self {
        Self { http, search_limit: DEFAULT_SEARCH_LIMIT }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    async fn fetch_search(&self, query: &str) -> ProviderResult<Vec<SearchMatch>> {
        let resp: PairsResponse = self.http.get_json("/search", &[("q", query)]).await?;
        Ok(resp
            .pairs
            .unwrap_or_default()
            .into_iter()
            .take(self.search_limit)
            .map(|p| {
                SearchMatch::new(p.base_token.name, p.base_token.symbol, NAME)
                    .with_id(p.base_token.address)
                    .with_network(p.chain_id)
            })
            .collect())
    }

    async fn fetch_info(&self, address: &str) -> ProviderResult<TokenInfoRecord> {
        let resp: PairsResponse = self
            .http
            .get_json(&format!("/tokens/{}", segment(address)), &[])
            .await?;
        pairs_to_info(resp.pairs.unwrap_or_default(), self.search_limit)
            .ok_or_else(|| ProviderError::not_found(address.to_string()))?
    }
}

fn pair_record(p: &Pair) -> DexPairRecord {
    DexPairRecord {
        dex_id: p.dex_id.clone(),
        pair_address: p.pair_address.clone(),
        base_symbol: normaliser::symbol(&p.base_token.symbol),
        quote_symbol: normaliser::symbol(&p.quote_token.symbol),
        network: Some(p.chain_id.clone()),
        price_usd: p.price_usd.and_then(normaliser::non_negative),
        volume_24h: p.volume.as_ref().and_then(|v| v.h24).and_then(normaliser::non_negative),
        liquidity_usd: p.liquidity.as_ref().and_then(|l| l.usd).and_then(normaliser::non_negative),
        url: p.url.clone(),
    }
}

fn links(info: Option<PairInfo>) -> Links {
    let info = info.unwrap_or_default();
    let social = |kind: &str| {
        info.socials
            .iter()
            .find(|s| s.kind.eq_ignore_ascii_case(kind))
            .map(|s| s.url.clone())
    };
    Links {
        website: info.websites.first().map(|w| w.url.clone()),
        twitter: social("twitter"),
        telegram: social("telegram"),
        discord: social("discord"),
        github: None,
    }
}

/// `None` when there are no pairs at all.
fn pairs_to_info(pairs: Vec<Pair>, keep: usize) -> Option<ProviderResult<TokenInfoRecord>> {
    let records: Vec<DexPairRecord> = pairs.iter().take(keep).map(pair_record).collect();
    let mut pairs = pairs.into_iter();
    let head = pairs.next()?;

    let build = move || -> ProviderResult<TokenInfoRecord> {
        let price = head
            .price_usd
            .and_then(normaliser::non_negative)
            .ok_or(ProviderError::InvalidField("priceUsd"))?;
        let mut info = TokenInfoRecord::new(head.base_token.name, head.base_token.symbol, price, NAME)?;
        info.address = Some(head.base_token.address);
        info.network = Some(head.chain_id);
        info.fdv = head.fdv.and_then(normaliser::non_negative);
        info.market_cap = head.market_cap.and_then(normaliser::non_negative);
        info.volume_24h = head.volume.and_then(|v| v.h24).and_then(normaliser::non_negative);
        info.liquidity_usd = head.liquidity.and_then(|l| l.usd).and_then(normaliser::non_negative);
        info.price_change_percentage_24h = head.price_change.and_then(|c| c.h24);
        info.links = links(head.info);
        info.pairs = records;
        Ok(info)
    };
    Some(build())
}

#[async_trait]
impl Provider for DexScreener {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::addresses().with_search()
    }

    async fn search(&self, query: &str) -> Vec<SearchMatch> {
        settle_search(NAME, self.fetch_search(query).await)
    }

    async fn price(&self, query: &str, _network: Option<&str>) -> Option<PriceRecord> {
        let info = self.fetch_info(query).await;
        settle(NAME, "price", info.map(|i| i.to_price()))
    }

    async fn token_info(&self, query: &str, _network: Option<&str>) -> Option<TokenInfoRecord> {
        settle(NAME, "token_info", self.fetch_info(query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEPE: &str = r#"{"pairs":[
        {"chainId":"ethereum","dexId":"uniswap","url":"https://dexscreener.com/ethereum/0xa43f",
         "pairAddress":"0xA43fe16908251ee70EF74718545e4FE6C5cCEc9f",
         "baseToken":{"address":"0x6982508145454Ce325dDbE47a25d4ec3d2311933","name":"Pepe","symbol":"PEPE"},
         "quoteToken":{"address":"0xC02a","name":"Wrapped Ether","symbol":"WETH"},
         "priceUsd":"0.00001234","volume":{"h24":1500000.5},"priceChange":{"h24":-3.2},
         "liquidity":{"usd":25000000},"fdv":5200000000,"marketCap":5200000000,
         "info":{"websites":[{"url":"https://pepe.vip"}],
                 "socials":[{"type":"twitter","url":"https://x.com/pepecoineth"}]}},
        {"chainId":"ethereum","dexId":"uniswap","pairAddress":"0x11950",
         "baseToken":{"address":"0x6982508145454Ce325dDbE47a25d4ec3d2311933","name":"Pepe","symbol":"PEPE"},
         "quoteToken":{"address":"0xdAC1","name":"Tether","symbol":"USDT"},
         "priceUsd":"0.00001233"}
    ]}"#;

    #[test]
    fn test_first_pair_is_headline() {
        let resp: PairsResponse = serde_json::from_str(PEPE).unwrap();
        let info = pairs_to_info(resp.pairs.unwrap(), 10).unwrap().unwrap();
        assert_eq!(info.symbol(), "PEPE");
        assert_eq!(info.price_usd(), 0.00001234);
        assert_eq!(info.network.as_deref(), Some("ethereum"));
        assert_eq!(info.liquidity_usd, Some(25_000_000.0));
        assert_eq!(info.links.twitter.as_deref(), Some("https://x.com/pepecoineth"));
        assert_eq!(info.links.telegram, None);
        assert_eq!(info.pairs.len(), 2);
        assert_eq!(info.pairs[1].quote_symbol, "USDT");
        assert_eq!(info.pairs[1].volume_24h, None);
    }

    #[test]
    fn test_pair_list_is_capped() {
        let resp: PairsResponse = serde_json::from_str(PEPE).unwrap();
        let info = pairs_to_info(resp.pairs.unwrap(), 1).unwrap().unwrap();
        assert_eq!(info.pairs.len(), 1);
    }

    #[test]
    fn test_null_pairs_is_not_found() {
        let resp: PairsResponse = serde_json::from_str(r#"{"schemaVersion":"1.0.0","pairs":null}"#).unwrap();
        assert!(pairs_to_info(resp.pairs.unwrap_or_default(), 10).is_none());
    }

    #[test]
    fn test_unparseable_price_is_rejected() {
        let json = PEPE.replace("\"0.00001234\"", "\"n/a\"");
        let resp: PairsResponse = serde_json::from_str(&json).unwrap();
        assert!(pairs_to_info(resp.pairs.unwrap(), 10).unwrap().is_err());
    }
}
