//! Typed errors for the listing feed.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::time::Duration;

use thiserror::Error;

/// What a single provider call can fail with.
///
/// This is the signal the fetcher classifies: only `RateLimited` is retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// Provider asked us to slow down (HTTP 429)
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    /// Provider answered with a non-success status
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, timeout, or body decoding failure
    #[error("network error: {0}")]
    Network(String),
}

impl From<reso_client::ResoError> for ProviderError {
    fn from(err: reso_client::ResoError) -> Self {
        use reso_client::ResoError;

        match err {
            ResoError::RateLimited { retry_after } => ProviderError::RateLimited { retry_after },
            ResoError::Api { status, message } => ProviderError::Status { status, message },
            other => ProviderError::Network(other.to_string()),
        }
    }
}

/// Permanent failure of a fetch after the fetcher's own retry policy.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Still rate limited after exhausting every attempt
    #[error("rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Non-recoverable upstream status
    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Transport or decoding failure
    #[error("network error: {0}")]
    Network(String),
}

/// Why the live path of a session was abandoned.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// No provider credential configured
    #[error("listing provider is not configured")]
    NotConfigured,

    /// Overall search deadline elapsed
    #[error("search exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),
}

/// Rejected search criteria.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("location must not be empty")]
    EmptyLocation,

    #[error("batch size must be greater than zero")]
    ZeroBatchSize,

    #[error("max total must be greater than zero")]
    ZeroMaxTotal,

    #[error("min price {min} exceeds max price {max}")]
    InvertedPriceRange { min: u64, max: u64 },
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reso_client::ResoError;

    #[test]
    fn reso_errors_classify() {
        let limited: ProviderError = ResoError::RateLimited {
            retry_after: Some(Duration::from_secs(2)),
        }
        .into();
        assert_eq!(
            limited,
            ProviderError::RateLimited {
                retry_after: Some(Duration::from_secs(2))
            }
        );

        let api: ProviderError = ResoError::Api {
            status: 503,
            message: "maintenance".into(),
        }
        .into();
        assert_eq!(
            api,
            ProviderError::Status {
                status: 503,
                message: "maintenance".into()
            }
        );

        let decode: ProviderError =
            ResoError::Decode(serde_json::from_str::<u8>("x").unwrap_err()).into();
        assert!(matches!(decode, ProviderError::Network(_)));
    }

    #[test]
    fn feed_error_is_transparent_over_fetch() {
        let err = FeedError::from(FetchError::Upstream {
            status: 500,
            message: "boom".into(),
        });
        assert_eq!(err.to_string(), "upstream error 500: boom");
    }
}
