// Layered settings: built-in defaults, then an optional TOML file, then
// PRICEFOLD__* environment variables (e.g. PRICEFOLD__HTTP__TIMEOUT_MS=3000).

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "pricefold";
pub const ENV_PREFIX: &str = "PRICEFOLD";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// tracing-subscriber filter used when RUST_LOG is unset
    pub log_filter: String,
    /// top-N cap on each adapter's search results
    pub search_limit: usize,
    pub http: HttpSettings,
    pub endpoints: Endpoints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "warn".into(),
            search_limit: 10,
            http: HttpSettings::default(),
            endpoints: Endpoints::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: concat!("pricefold/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Vendor base URLs. Overridable so a mirror or a test server can stand in.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub binance: String,
    pub coincap: String,
    pub coingecko: String,
    pub coinpaprika: String,
    pub cryptocompare: String,
    pub dexscreener: String,
    pub geckoterminal: String,
    pub fear_greed: String,
    pub etherscan: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            binance: "https://api.binance.com/api/v3".into(),
            coincap: "https://api.coincap.io/v2".into(),
            coingecko: "https://api.coingecko.com/api/v3".into(),
            coinpaprika: "https://api.coinpaprika.com/v1".into(),
            cryptocompare: "https://min-api.cryptocompare.com/data".into(),
            dexscreener: "https://api.dexscreener.com/latest/dex".into(),
            geckoterminal: "https://api.geckoterminal.com/api/v2".into(),
            fear_greed: "https://api.alternative.me".into(),
            etherscan: "https://api.etherscan.io".into(),
        }
    }
}

impl Settings {
    /// Load settings. An explicit `path` must exist; otherwise `pricefold.toml`
    /// in the working directory is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.search_limit, 10);
        assert_eq!(s.http.timeout_ms, 10_000);
        assert!(s.endpoints.coingecko.starts_with("https://"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let s: Settings = Config::builder()
            .add_source(File::from_str(
                "search_limit = 5\n[http]\ntimeout_ms = 1500\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(s.search_limit, 5);
        assert_eq!(s.http.timeout_ms, 1500);
        assert_eq!(s.endpoints.binance, Endpoints::default().binance);
        assert_eq!(s.log_filter, "warn");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }
}
