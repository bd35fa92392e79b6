//! Error types for the RESO client.

use std::time::Duration;

use thiserror::Error;

/// Result type for RESO client operations.
pub type Result<T> = std::result::Result<T, ResoError>;

/// RESO client errors.
#[derive(Debug, Error)]
pub enum ResoError {
    /// The provider answered 429. `retry_after` carries its `Retry-After` hint, if any.
    #[error("rate limited by provider")]
    RateLimited { retry_after: Option<Duration> },

    /// Any other non-2xx response
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Connection failed, timed out, or the body could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was read but is not a valid property page
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL could not be joined with the resource path
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ResoError {
    /// HTTP status associated with this error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ResoError::RateLimited { .. } => Some(429),
            ResoError::Api { status, .. } => Some(*status),
            ResoError::Http(e) => e.status().map(|s| s.as_u16()),
            ResoError::Decode(_) | ResoError::InvalidUrl(_) => None,
        }
    }
}
