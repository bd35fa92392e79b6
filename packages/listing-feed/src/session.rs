//! Streaming session: one search, one subscriber, one event channel.
//!
//! The session drives the aggregator page by page, transforms each record and
//! pushes typed events to the subscriber. Any live-path failure switches the
//! session to the demo dataset, so a subscriber always sees a `complete`
//! event unless it went away first.
//!
//! ```text
//! Idle -> Connecting -> Streaming -> Completed
//!              \            \
//!               +------------+----> DegradedDemo
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregator::SearchAggregator;
use crate::demo::DemoDataSource;
use crate::error::FeedError;
use crate::fetcher::RateLimitedFetcher;
use crate::traits::Clock;
use crate::transform::ListingTransformer;
use crate::types::criteria::SearchCriteria;
use crate::types::event::StreamEvent;

/// Pacing and limits for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause between live records. Default: 100ms.
    pub record_delay: Duration,

    /// Pause before each demo record. Default: 300ms.
    pub demo_delay: Duration,

    /// Upper bound on the live search. Default: none.
    pub deadline: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            record_delay: Duration::from_millis(100),
            demo_delay: Duration::from_millis(300),
            deadline: None,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record_delay(mut self, delay: Duration) -> Self {
        self.record_delay = delay;
        self
    }

    pub fn with_demo_delay(mut self, delay: Duration) -> Self {
        self.demo_delay = delay;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Streaming,
    DegradedDemo,
    Completed,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Live search ran to its natural end
    Completed { total: usize },
    /// Live path failed; `total` demo records were served
    Demo { total: usize, live: usize },
    /// Subscriber went away; `emitted` records had been sent
    Cancelled { emitted: usize },
}

/// The subscriber is gone; stop without emitting anything else.
#[derive(Debug)]
struct Disconnected;

enum LiveEnd {
    Finished,
    Failed(FeedError),
    Disconnected,
}

pub struct StreamingSession {
    location: String,
    max_total: usize,
    aggregator: Option<SearchAggregator>,
    transformer: ListingTransformer,
    demo: DemoDataSource,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    state: SessionState,
    live_emitted: usize,
}

impl StreamingSession {
    /// A session over `criteria`. Without a fetcher the live path fails
    /// immediately with [`FeedError::NotConfigured`].
    pub fn new(
        criteria: SearchCriteria,
        fetcher: Option<RateLimitedFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            location: criteria.location().to_string(),
            max_total: criteria.max_total(),
            aggregator: fetcher.map(|f| SearchAggregator::new(f, criteria)),
            transformer: ListingTransformer::new(),
            demo: DemoDataSource::new(),
            clock,
            config: SessionConfig::default(),
            state: SessionState::Idle,
            live_emitted: 0,
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_transformer(mut self, transformer: ListingTransformer) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run to a terminal state, pushing events into `tx`.
    ///
    /// The sender is dropped when this returns, which closes the channel.
    /// Cancelling `cancel` (or dropping the receiver) stops the session at
    /// its next await point; any in-flight fetch is abandoned.
    pub async fn run(
        mut self,
        tx: mpsc::Sender<StreamEvent>,
        cancel: CancellationToken,
    ) -> SessionOutcome {
        info!(
            location = %self.location,
            max_total = self.max_total,
            configured = self.aggregator.is_some(),
            "Starting listing session"
        );

        self.state = SessionState::Connecting;
        if self
            .emit(&tx, &cancel, StreamEvent::status("connecting"))
            .await
            .is_err()
        {
            return self.disconnected();
        }

        let live = match self.config.deadline {
            None => self.stream_live(&tx, &cancel).await,
            Some(limit) => {
                let clock = self.clock.clone();
                tokio::select! {
                    end = self.stream_live(&tx, &cancel) => end,
                    _ = clock.sleep(limit) => LiveEnd::Failed(FeedError::DeadlineExceeded(limit)),
                }
            }
        };

        match live {
            LiveEnd::Finished => {
                self.state = SessionState::Completed;
                let total = self.live_emitted;
                if self
                    .emit(&tx, &cancel, StreamEvent::complete(total, false))
                    .await
                    .is_err()
                {
                    return self.disconnected();
                }
                info!(location = %self.location, total, "Listing session complete");
                SessionOutcome::Completed { total }
            }
            LiveEnd::Failed(err) => match self.serve_demo(err, &tx, &cancel).await {
                Ok(total) => SessionOutcome::Demo {
                    total,
                    live: self.live_emitted,
                },
                Err(Disconnected) => self.disconnected(),
            },
            LiveEnd::Disconnected => self.disconnected(),
        }
    }

    async fn stream_live(
        &mut self,
        tx: &mpsc::Sender<StreamEvent>,
        cancel: &CancellationToken,
    ) -> LiveEnd {
        let Some(mut aggregator) = self.aggregator.take() else {
            return LiveEnd::Failed(FeedError::NotConfigured);
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return LiveEnd::Disconnected,
                next = aggregator.next_batch() => next,
            };

            let batch = match next {
                Ok(Some(batch)) => batch,
                Ok(None) => return LiveEnd::Finished,
                Err(e) => return LiveEnd::Failed(e.into()),
            };

            if self.state == SessionState::Connecting {
                debug!(location = %self.location, "First page received");
                self.state = SessionState::Streaming;
            }

            let start = StreamEvent::batch_start(batch.number, batch.offset, batch.records.len());
            if self.emit(tx, cancel, start).await.is_err() {
                return LiveEnd::Disconnected;
            }

            for raw in &batch.records {
                if self.live_emitted > 0
                    && self.pause(cancel, self.config.record_delay).await.is_err()
                {
                    return LiveEnd::Disconnected;
                }

                let listing = self.transformer.transform(raw);
                if self
                    .emit(tx, cancel, StreamEvent::record(listing, false))
                    .await
                    .is_err()
                {
                    return LiveEnd::Disconnected;
                }
                self.live_emitted += 1;
            }
        }
    }

    /// Replace the live path with demo records, bounded by what is left of
    /// `max_total`. Returns the number of demo records sent.
    async fn serve_demo(
        &mut self,
        err: FeedError,
        tx: &mpsc::Sender<StreamEvent>,
        cancel: &CancellationToken,
    ) -> Result<usize, Disconnected> {
        warn!(
            location = %self.location,
            error = %err,
            live_records = self.live_emitted,
            "Live search failed, serving demo listings"
        );
        self.state = SessionState::DegradedDemo;

        self.emit(tx, cancel, StreamEvent::error(err.to_string()))
            .await?;

        let budget = self.max_total.saturating_sub(self.live_emitted);
        let mut total = 0;
        for listing in self.demo.listings().into_iter().take(budget) {
            self.pause(cancel, self.config.demo_delay).await?;
            self.emit(tx, cancel, StreamEvent::record(listing, true))
                .await?;
            total += 1;
        }

        self.emit(tx, cancel, StreamEvent::complete(total, true))
            .await?;
        info!(location = %self.location, total, "Demo session complete");
        Ok(total)
    }

    async fn emit(
        &self,
        tx: &mpsc::Sender<StreamEvent>,
        cancel: &CancellationToken,
        event: StreamEvent,
    ) -> Result<(), Disconnected> {
        if cancel.is_cancelled() {
            return Err(Disconnected);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Disconnected),
            sent = tx.send(event) => sent.map_err(|_| Disconnected),
        }
    }

    async fn pause(&self, cancel: &CancellationToken, delay: Duration) -> Result<(), Disconnected> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Disconnected),
            _ = self.clock.sleep(delay) => Ok(()),
        }
    }

    fn disconnected(&self) -> SessionOutcome {
        debug!(
            location = %self.location,
            state = ?self.state,
            "Subscriber disconnected, stopping session"
        );
        SessionOutcome::Cancelled {
            emitted: self.live_emitted,
        }
    }
}
