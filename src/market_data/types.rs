// Normalized result shapes shared by every provider adapter.
//
// Records are immutable once built: the headline fields (symbol, price, source,
// observation time) are private and only reachable through validating
// constructors, so a record can never carry a NaN/negative price or an empty source.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ProviderError, ProviderResult};

fn check_headline(price_usd: f64, source: &str) -> ProviderResult<()> {
    if !price_usd.is_finite() || price_usd < 0.0 {
        return Err(ProviderError::InvalidField("priceUsd"));
    }
    if source.trim().is_empty() {
        return Err(ProviderError::InvalidField("source"));
    }
    Ok(())
}

/// Spot USD price of one asset as reported by a single provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    symbol: String,
    price_usd: f64,
    source: String,
    observed_at: DateTime<Utc>,
}

impl PriceRecord {
    /// Stamps the record with the current time. Fails on a non-finite or
    /// negative price and on an empty source.
    pub fn new(
        symbol: impl Into<String>,
        price_usd: f64,
        source: impl Into<String>,
    ) -> ProviderResult<Self> {
        Self::observed(symbol, price_usd, source, Utc::now())
    }

    pub fn observed(
        symbol: impl Into<String>,
        price_usd: f64,
        source: impl Into<String>,
        observed_at: DateTime<Utc>,
    ) -> ProviderResult<Self> {
        let source = source.into();
        check_headline(price_usd, &source)?;
        Ok(Self {
            symbol: symbol.into().to_uppercase(),
            price_usd,
            source,
            observed_at,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn price_usd(&self) -> f64 {
        self.price_usd
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Links {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

impl Links {
    pub fn is_empty(&self) -> bool {
        self.website.is_none()
            && self.twitter.is_none()
            && self.telegram.is_none()
            && self.discord.is_none()
            && self.github.is_none()
    }
}

/// One liquidity pool snapshot for a token on a DEX.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPairRecord {
    pub dex_id: String,
    pub pair_address: String,
    pub base_symbol: String,
    pub quote_symbol: String,
    pub network: Option<String>,
    pub price_usd: Option<f64>,
    pub volume_24h: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub url: Option<String>,
}

/// Detailed token information. Every optional field is `None` when the
/// provider did not report it; zero is a real value, never a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfoRecord {
    #[serde(flatten)]
    quote: PriceRecord,
    pub name: String,
    pub address: Option<String>,
    pub network: Option<String>,
    pub description: Option<String>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub fdv: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub volume_24h: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub price_change_percentage_7d: Option<f64>,
    pub ath: Option<f64>,
    pub ath_date: Option<DateTime<Utc>>,
    pub atl: Option<f64>,
    pub atl_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Links::is_empty")]
    pub links: Links,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pairs: Vec<DexPairRecord>,
}

impl TokenInfoRecord {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        price_usd: f64,
        source: impl Into<String>,
    ) -> ProviderResult<Self> {
        Ok(Self::from_quote(name, PriceRecord::new(symbol, price_usd, source)?))
    }

    pub fn from_quote(name: impl Into<String>, quote: PriceRecord) -> Self {
        Self {
            quote,
            name: name.into(),
            address: None,
            network: None,
            description: None,
            market_cap: None,
            market_cap_rank: None,
            fdv: None,
            circulating_supply: None,
            total_supply: None,
            max_supply: None,
            volume_24h: None,
            liquidity_usd: None,
            price_change_24h: None,
            price_change_percentage_24h: None,
            price_change_percentage_7d: None,
            ath: None,
            ath_date: None,
            atl: None,
            atl_date: None,
            links: Links::default(),
            pairs: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        self.quote.symbol()
    }

    pub fn price_usd(&self) -> f64 {
        self.quote.price_usd()
    }

    pub fn source(&self) -> &str {
        self.quote.source()
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.quote.observed_at()
    }

    /// The price view of this record, keeping its observation time.
    pub fn to_price(&self) -> PriceRecord {
        self.quote.clone()
    }
}

/// One search hit. `symbol` is upper-cased on construction because it is the
/// cross-provider dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub id: Option<String>,
    pub name: String,
    pub symbol: String,
    pub network: Option<String>,
    pub source: String,
}

impl SearchMatch {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            symbol: symbol.into().to_uppercase(),
            network: None,
            source: source.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Case-insensitive match on symbol or vendor id, used by adapters that
    /// resolve a ticker to their own coin id.
    pub fn is_match_for(&self, query: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(query)
            || self.id.as_deref().is_some_and(|id| id.eq_ignore_ascii_case(query))
    }
}

// Auxiliary report shapes

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMarket {
    pub total_market_cap_usd: f64,
    pub total_volume_24h_usd: f64,
    pub bitcoin_dominance_percentage: f64,
    pub ethereum_dominance_percentage: f64,
    pub active_cryptocurrencies: u64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub price_usd: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub volume_24h: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub price_usd: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    pub value: u8,
    pub classification: String,
    pub last_updated: DateTime<Utc>,
}

/// Gas prices in gwei.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasOracle {
    pub network: String,
    pub low: f64,
    pub average: f64,
    pub high: f64,
    pub base_fee: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChart {
    pub coin_id: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceChart {
    /// `None` for an empty series.
    pub fn from_points(coin_id: impl Into<String>, points: Vec<(DateTime<Utc>, f64)>) -> Option<Self> {
        let (min_price, max_price) = points.iter().fold(None, |acc: Option<(f64, f64)>, (_, p)| {
            Some(match acc {
                None => (*p, *p),
                Some((lo, hi)) => (lo.min(*p), hi.max(*p)),
            })
        })?;
        Some(Self {
            coin_id: coin_id.into(),
            points,
            min_price,
            max_price,
        })
    }
}
