//! Error taxonomy for provider adapters.
//!
//! None of these ever reach a caller of the aggregator: adapters collapse them
//! into "no result" at their boundary (see `market_data::adapters::settle`).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("rate limited")]
    RateLimited,

    #[error("server returned status {0}")]
    Status(u16),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("missing or invalid field `{0}`")]
    InvalidField(&'static str),
}

impl ProviderError {
    /// True when the vendor could not be reached or answered garbage, as opposed
    /// to answering "no such asset". Only used to pick a log level.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Transport(_)
            | ProviderError::Timeout
            | ProviderError::RateLimited
            | ProviderError::Decode(_) => true,
            ProviderError::Status(code) => *code >= 500,
            ProviderError::NotFound(_) | ProviderError::InvalidField(_) => false,
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        ProviderError::NotFound(what.into())
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
