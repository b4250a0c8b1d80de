//! Unified price/info/search queries over public crypto market-data APIs.
//!
//! [`Aggregator`] walks provider fallback chains for `price` and `info` and
//! fans `search` out to every search-capable provider at once.

pub mod config;
pub mod error;
pub mod market_data;
pub mod telemetry;

pub use config::Settings;
pub use error::{ProviderError, ProviderResult};
pub use market_data::reports::Reports;
pub use market_data::types::{PriceRecord, SearchMatch, TokenInfoRecord};
pub use market_data::{Aggregator, Capabilities, DefaultProviders, Provider, Routes};
