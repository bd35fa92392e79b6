//! Incremental Listing Ingestion
//!
//! Queries a listings provider page by page, stays under its rate limit,
//! normalizes each record into a [`Listing`] and streams the results to one
//! subscriber as typed [`StreamEvent`]s. When the provider is unavailable
//! the session falls back to a fixed demo dataset, so every subscriber that
//! stays connected sees a `complete` event.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use listing_feed::{ListingFeed, SearchCriteria};
//! use reso_client::ResoClient;
//!
//! let client = ResoClient::new("https://api.example.com/OData/test", token)?;
//! let feed = ListingFeed::new(Some(Arc::new(client)));
//!
//! let criteria = SearchCriteria::builder("Los Angeles, CA")
//!     .min_price(Some(500_000))
//!     .build()?;
//!
//! let mut events = Box::pin(feed.subscribe(criteria));
//! while let Some(event) = events.next().await {
//!     println!("{}", serde_json::to_string(&event)?);
//! }
//! ```
//!
//! # Modules
//!
//! - [`fetcher`] - Request pacing and bounded rate-limit retries
//! - [`aggregator`] - Offset pagination with a capped total
//! - [`transform`] - Provider record to [`Listing`] normalization
//! - [`session`] - Session state machine with demo fallback
//! - [`demo`] - Fixed demo dataset
//! - [`testing`] - Mock provider and virtual clock

pub mod aggregator;
pub mod demo;
pub mod error;
pub mod feed;
pub mod fetcher;
pub mod session;
pub mod testing;
pub mod traits;
pub mod transform;
pub mod types;

// Re-export core types at crate root
pub use aggregator::{Batch, EndReason, SearchAggregator};
pub use demo::DemoDataSource;
pub use error::{CriteriaError, FeedError, FetchError, FetchResult, ProviderError, ProviderResult};
pub use feed::ListingFeed;
pub use fetcher::{
    FetchAttempt, LimiterRegistry, LimiterScope, RateLimitedFetcher, RateLimiter, RetryPolicy,
    DEFAULT_MIN_SPACING,
};
pub use session::{SessionConfig, SessionOutcome, SessionState, StreamingSession};
pub use traits::{Clock, ListingProvider, TokioClock};
pub use transform::{Feature, ListingTransformer, DEFAULT_DESCRIPTION, PLACEHOLDER_IMAGE};
pub use types::{
    criteria::{CriteriaBuilder, SearchCriteria, DEFAULT_BATCH_SIZE, DEFAULT_MAX_TOTAL},
    event::{EventKind, StreamEvent},
    listing::{EstimatedValue, Listing, PriceHistory, PricePoint, Trend},
};

// Re-export testing utilities
pub use testing::{MockClock, MockProvider};
