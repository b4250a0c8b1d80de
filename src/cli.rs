//! Command-line arguments for the `pricefold` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use pricefold_rs::market_data::reports::DEFAULT_CHART_DAYS;

/// pricefold - one query, many crypto market-data APIs
///
/// Prices and token details are taken from the first provider that answers;
/// search merges every provider's matches.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Settings file (defaults to ./pricefold.toml when present)
    #[arg(long, global = true, env = "PRICEFOLD_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Per-request HTTP timeout in milliseconds, overrides the settings file
    #[arg(long = "timeout-ms", global = true)]
    pub timeout_ms: Option<u64>,

    /// Serve Prometheus metrics on this port (needs the metrics-exporter feature)
    #[arg(long = "metrics-port", global = true, env = "PRICEFOLD_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Current USD price for a ticker, coin id or contract address
    Price {
        query: String,
        /// Chain qualifier for address lookups (e.g. eth, bsc, solana)
        #[arg(short, long)]
        network: Option<String>,
    },
    /// Detailed token information
    Info {
        query: String,
        #[arg(short, long)]
        network: Option<String>,
    },
    /// Search every provider and merge the matches
    Search { query: String },
    /// Global market snapshot
    Market,
    /// Top trending coins right now
    Trending,
    /// Top coins by market cap
    Top,
    /// Fear & greed index
    Sentiment,
    /// Ethereum gas prices (gwei)
    Gas,
    /// Historical USD price series
    Chart {
        query: String,
        #[arg(short, long, default_value_t = DEFAULT_CHART_DAYS)]
        days: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_with_network() {
        let args = Args::try_parse_from(["pricefold", "price", "0xabc", "--network", "eth", "--json"]).unwrap();
        assert!(args.json);
        match args.command {
            Command::Price { query, network } => {
                assert_eq!(query, "0xabc");
                assert_eq!(network.as_deref(), Some("eth"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_chart_days_default() {
        let args = Args::try_parse_from(["pricefold", "chart", "btc"]).unwrap();
        assert!(matches!(args.command, Command::Chart { days: DEFAULT_CHART_DAYS, .. }));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
