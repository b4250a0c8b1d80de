use tracing_subscriber::EnvFilter;

pub const PROVIDER_CALLS: &str = "pricefold_provider_calls_total";

pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    // try_init: a second call (tests, embedding apps) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    Miss,
    Error,
    Panic,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::Miss => "miss",
            Outcome::Error => "error",
            Outcome::Panic => "panic",
        }
    }
}

/// Count one provider call. A no-op until a recorder is installed.
pub fn record_call(provider: &str, op: &'static str, outcome: Outcome) {
    metrics::counter!(
        PROVIDER_CALLS,
        "provider" => provider.to_string(),
        "op" => op,
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;
    metrics::describe_counter!(PROVIDER_CALLS, "provider adapter calls by outcome");
    tracing::info!(port, "prometheus exporter listening");
    Ok(())
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    tracing::warn!(port, "metrics port ignored, built without the metrics-exporter feature");
    Ok(())
}
