//! Exchange-specific error types
//!
//! Transport failures and non-2xx statuses are transient and retried by the
//! REST client; everything else is fatal for the operation that raised it.

use thiserror::Error;
use tracklet_core::{AmountError, StoreError};

/// Result type for exchange operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Exchange operation errors
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("could not request '{endpoint}' endpoint: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<ExchangeError>,
    },

    #[error("API error {code}: {message}")]
    ApiError { code: String, message: String },

    #[error("could not decode {kind}: {message}")]
    Decode { kind: String, message: String },

    #[error("Invalid {field} in {kind}: {source}")]
    InvalidNumber {
        kind: String,
        field: &'static str,
        #[source]
        source: AmountError,
    },

    #[error("Price unavailable for {asset}: {reason}")]
    PriceUnavailable { asset: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl ExchangeError {
    /// Network failures and unsuccessful statuses are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_) | Self::HttpError(..) | Self::Timeout(_)
        )
    }

    /// Wrap the last observed error with the endpoint that produced it.
    pub fn request_failed(endpoint: &str, source: ExchangeError) -> Self {
        Self::RequestFailed {
            endpoint: endpoint.to_string(),
            source: Box::new(source),
        }
    }

    pub fn decode(kind: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ExchangeError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
