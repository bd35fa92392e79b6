//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use listing_feed::{ListingFeed, ListingProvider, SessionConfig};
use reso_client::ResoClient;
use secrecy::ExposeSecret;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::server::routes::{health_handler, stream_listings_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<ListingFeed>,
    /// Upper bound applied to every request's `maxTotal`
    pub max_total_ceiling: usize,
}

impl AppState {
    pub fn new(feed: ListingFeed, max_total_ceiling: usize) -> Self {
        Self {
            feed: Arc::new(feed),
            max_total_ceiling,
        }
    }
}

/// Build the listing feed from configuration.
///
/// Without an access token the feed has no provider and every session goes
/// straight to demo listings.
pub fn build_feed(config: &Config) -> Result<ListingFeed> {
    let provider: Option<Arc<dyn ListingProvider>> = match &config.reso_access_token {
        Some(token) => {
            let client: Arc<dyn ListingProvider> = Arc::new(
                ResoClient::new(&config.reso_api_url, token.expose_secret())
                    .context("Failed to create RESO client")?,
            );
            Some(client)
        }
        None => {
            tracing::warn!("RESO_ACCESS_TOKEN not set, serving demo listings only");
            None
        }
    };

    Ok(ListingFeed::new(provider)
        .with_limiter(config.limiter_scope, config.request_spacing)
        .with_session_config(SessionConfig::default().with_deadline(config.search_deadline)))
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Result<Router> {
    // CORS configuration - EventSource clients on any origin may read the stream
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE]);

    // Rate limiting configuration
    // Each stream can hold upstream quota for minutes, so throttle per IP
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2) // Base rate: one new stream every 2s per IP
            .burst_size(10) // Allow bursts up to 10
            .use_headers() // Report x-ratelimit-* headers
            .finish()
            .context("Invalid rate limiter configuration")?,
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let app = Router::new()
        .route("/api/listings/stream", get(stream_listings_handler))
        .layer(rate_limit_layer)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
