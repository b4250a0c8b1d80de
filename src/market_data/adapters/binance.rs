// Binance spot tickers. Fastest symbol source, but no metadata and no real
// search endpoint: `search` only checks whether a USDT pair exists.

use async_trait::async_trait;

use super::binance_types::{Ticker24h, TickerPrice};
use super::{settle, settle_search, Capabilities, Provider};
use crate::error::{ProviderError, ProviderResult};
use crate::market_data::http::HttpClient;
use crate::market_data::normaliser;
use crate::market_data::types::{PriceRecord, SearchMatch, TokenInfoRecord};

const NAME: &str = "Binance";
// USD-stable quotes only, the record is a USD price
const QUOTE_SUFFIXES: [&str; 2] = ["USDT", "BUSD"];

pub struct Binance {
    http: HttpClient,
}

impl Binance {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// "eth" -> "ETHUSDT"; a query that already names a USD-stable pair
    /// ("SOLUSDT") is kept. A bare "USDT" still gets the suffix.
    pub fn trading_pair(symbol: &str) -> String {
        let s = normaliser::symbol(symbol);
        let is_pair = QUOTE_SUFFIXES
            .iter()
            .any(|q| s.len() > q.len() && s.ends_with(q));
        if is_pair {
            s
        } else {
            format!("{}USDT", s)
        }
    }

    async fn ticker_price(&self, pair: &str) -> ProviderResult<TickerPrice> {
        self.http.get_json("/ticker/price", &[("symbol", pair)]).await
    }

    async fn fetch_price(&self, symbol: &str) -> ProviderResult<PriceRecord> {
        let ticker = self.ticker_price(&Self::trading_pair(symbol)).await?;
        let price = normaliser::parse_price(&ticker.price).ok_or(ProviderError::InvalidField("price"))?;
        PriceRecord::new(symbol, price, NAME)
    }

    async fn fetch_info(&self, symbol: &str) -> ProviderResult<TokenInfoRecord> {
        let pair = Self::trading_pair(symbol);
        let ticker: Ticker24h = self.http.get_json("/ticker/24hr", &[("symbol", pair.as_str())]).await?;
        let price = normaliser::parse_price(&ticker.last_price)
            .ok_or(ProviderError::InvalidField("lastPrice"))?;

        let sym = normaliser::symbol(symbol);
        let mut info = TokenInfoRecord::new(sym.clone(), sym, price, NAME)?;
        info.volume_24h = ticker.quote_volume.as_deref().and_then(normaliser::parse_price);
        info.price_change_24h = ticker.price_change.as_deref().and_then(normaliser::parse_decimal);
        info.price_change_percentage_24h =
            ticker.price_change_percent.as_deref().and_then(normaliser::parse_decimal);
        Ok(info)
    }

    /// Base asset of a pair built by [`Binance::trading_pair`].
    pub fn base_asset(pair: &str) -> &str {
        QUOTE_SUFFIXES
            .iter()
            .find_map(|q| pair.strip_suffix(q))
            .unwrap_or(pair)
    }

    async fn lookup_pair(&self, query: &str) -> ProviderResult<Vec<SearchMatch>> {
        let pair = Self::trading_pair(query);
        let ticker = self.ticker_price(&pair).await?;
        let base = Self::base_asset(&pair);
        Ok(vec![SearchMatch::new(base, base, NAME).with_id(ticker.symbol)])
    }
}

#[async_trait]
impl Provider for Binance {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::symbols()
    }

    async fn search(&self, query: &str) -> Vec<SearchMatch> {
        settle_search(NAME, self.lookup_pair(query).await)
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
    fn test_trading_pair() {
        assert_eq!(Binance::trading_pair("eth"), "ETHUSDT");
        assert_eq!(Binance::trading_pair("BTC"), "BTCUSDT");
        assert_eq!(Binance::trading_pair("ETHBTC"), "ETHBTCUSDT");
        assert_eq!(Binance::trading_pair("USDT"), "USDTUSDT");
        assert_eq!(Binance::trading_pair("solusdt"), "SOLUSDT");
        assert_eq!(Binance::trading_pair("BNBBUSD"), "BNBBUSD");
    }

    #[test]
    fn test_base_asset() {
        assert_eq!(Binance::base_asset("SOLUSDT"), "SOL");
        assert_eq!(Binance::base_asset("BNBBUSD"), "BNB");
        assert_eq!(Binance::base_asset("USDTUSDT"), "USDT");
    }
}
