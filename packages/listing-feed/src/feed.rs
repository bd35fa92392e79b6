//! Entry point that wires provider, limiter, retry policy and session
//! settings together and hands out sessions.

use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::fetcher::{
    LimiterRegistry, LimiterScope, RateLimitedFetcher, RetryPolicy, DEFAULT_MIN_SPACING,
};
use crate::session::{SessionConfig, StreamingSession};
use crate::traits::{Clock, ListingProvider, TokioClock};
use crate::transform::ListingTransformer;
use crate::types::criteria::SearchCriteria;
use crate::types::event::StreamEvent;

/// Events buffered between a session task and its subscriber.
const EVENT_BUFFER: usize = 32;

/// Shared across requests; cheap to clone behind an `Arc`.
pub struct ListingFeed {
    provider: Option<Arc<dyn ListingProvider>>,
    limiters: LimiterRegistry,
    policy: RetryPolicy,
    session: SessionConfig,
    clock: Arc<dyn Clock>,
}

impl ListingFeed {
    /// A feed on real time with default pacing. `None` means every session
    /// serves demo data.
    pub fn new(provider: Option<Arc<dyn ListingProvider>>) -> Self {
        Self::with_clock(provider, Arc::new(TokioClock))
    }

    pub fn with_clock(provider: Option<Arc<dyn ListingProvider>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            limiters: LimiterRegistry::new(
                LimiterScope::default(),
                DEFAULT_MIN_SPACING,
                clock.clone(),
            ),
            policy: RetryPolicy::default(),
            session: SessionConfig::default(),
            clock,
        }
    }

    /// Replace the limiter registry; existing sessions keep their limiter.
    pub fn with_limiter(mut self, scope: LimiterScope, min_spacing: Duration) -> Self {
        self.limiters = LimiterRegistry::new(scope, min_spacing, self.clock.clone());
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.session = config;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn limiter_scope(&self) -> LimiterScope {
        self.limiters.scope()
    }

    /// Build a session for `criteria` without starting it.
    pub fn open_session(&self, criteria: SearchCriteria) -> StreamingSession {
        let fetcher = self.provider.as_ref().map(|provider| {
            RateLimitedFetcher::new(provider.clone(), self.limiters.for_session())
                .with_policy(self.policy.clone())
        });

        StreamingSession::new(criteria, fetcher, self.clock.clone())
            .with_config(self.session.clone())
            .with_transformer(ListingTransformer::new())
    }

    /// Spawn a session and return its events as a stream.
    ///
    /// Dropping the stream cancels the session.
    pub fn subscribe(
        &self,
        criteria: SearchCriteria,
    ) -> impl Stream<Item = StreamEvent> + Send + 'static {
        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancellationToken::new();

        tokio::spawn(self.open_session(criteria).run(tx, cancel.clone()));

        let guard = cancel.drop_guard();
        async_stream::stream! {
            let _guard = guard;
            while let Some(event) = rx.recv().await {
                yield event;
            }
        }
    }
}
