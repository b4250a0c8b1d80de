//! Thin JSON-over-HTTPS client used by every adapter.
//!
//! One `reqwest::Client` (and its connection pool) is shared by all adapters;
//! each adapter owns an `HttpClient` that pairs it with the vendor base URL.
//! The per-request timeout lives on the shared client, so no single vendor can
//! stall a fallback chain or a search fan-out.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::HttpSettings;
use crate::error::{ProviderError, ProviderResult};

/// Build the shared client from configuration.
pub fn build_client(settings: &HttpSettings) -> ProviderResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_millis(settings.timeout_ms))
        .user_agent(settings.user_agent.clone())
        .pool_max_idle_per_host(4)
        .build()?;
    Ok(client)
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` with query pairs and decode the body as `T`.
    /// `path` must start with `/`; caller-supplied segments go through [`segment`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!(%url, ?query, "GET");

        let resp = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(map_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::NOT_FOUND => ProviderError::not_found(path.to_string()),
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
                other => ProviderError::Status(other.as_u16()),
            });
        }

        let body = resp.bytes().await.map_err(map_transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn map_transport(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err)
    }
}

/// Percent-encode a single path segment (coin id, address, network).
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw.trim()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let http = HttpClient::new(Client::new(), "https://api.example.com/v1/");
        assert_eq!(http.base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn test_segment_encodes_reserved() {
        assert_eq!(segment("btc-bitcoin"), "btc-bitcoin");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
