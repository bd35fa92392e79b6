//! Rate-limited fetcher.
//!
//! Wraps a [`ListingProvider`] with request spacing and bounded retries on
//! rate-limit responses. Everything above this layer sees either a page or a
//! permanent [`FetchError`].

pub mod backoff;
pub mod limiter;

pub use backoff::RetryPolicy;
pub use limiter::{LimiterRegistry, LimiterScope, RateLimiter, DEFAULT_MIN_SPACING};

use std::sync::Arc;
use std::time::Duration;

use reso_client::{PropertyPage, PropertyQuery};

use crate::error::{FetchError, FetchResult, ProviderError};
use crate::traits::ListingProvider;

/// State of one logical fetch across its retries.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchAttempt {
    pub query: PropertyQuery,
    /// Attempts made so far (1-based once the first request is issued)
    pub attempt: u32,
    /// Most recent backoff slept, if any
    pub backoff: Option<Duration>,
}

impl FetchAttempt {
    pub fn new(query: PropertyQuery) -> Self {
        Self {
            query,
            attempt: 0,
            backoff: None,
        }
    }
}

pub struct RateLimitedFetcher {
    provider: Arc<dyn ListingProvider>,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl RateLimitedFetcher {
    pub fn new(provider: Arc<dyn ListingProvider>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            provider,
            limiter,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch one page, pacing every request and retrying rate limits.
    pub async fn fetch(&self, query: &PropertyQuery) -> FetchResult<PropertyPage> {
        let mut state = FetchAttempt::new(query.clone());

        loop {
            state.attempt += 1;
            self.limiter.acquire().await;

            let retry_after = match self.provider.search(&state.query).await {
                Ok(page) => return Ok(page),
                Err(ProviderError::RateLimited { retry_after }) => retry_after,
                Err(ProviderError::Status { status, message }) => {
                    tracing::warn!(
                        provider = self.provider.name(),
                        status,
                        "Upstream returned non-success status"
                    );
                    return Err(FetchError::Upstream { status, message });
                }
                Err(ProviderError::Network(message)) => {
                    tracing::warn!(
                        provider = self.provider.name(),
                        error = %message,
                        "Upstream unreachable"
                    );
                    return Err(FetchError::Network(message));
                }
            };

            if state.attempt >= self.policy.max_attempts {
                tracing::warn!(
                    provider = self.provider.name(),
                    attempts = state.attempt,
                    "Rate limit retries exhausted"
                );
                return Err(FetchError::RateLimited {
                    attempts: state.attempt,
                });
            }

            let delay = self
                .policy
                .backoff(state.attempt, retry_after, &mut rand::thread_rng());
            state.backoff = Some(delay);

            tracing::warn!(
                provider = self.provider.name(),
                attempt = state.attempt,
                delay_ms = delay.as_millis() as u64,
                hinted = retry_after.is_some(),
                "Rate limited, backing off"
            );
            self.limiter.clock().sleep(delay).await;
        }
    }
}
