// Main entry point for the listing stream server

use anyhow::{Context, Result};
use server_core::{
    server::{build_app, build_feed, AppState},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,listing_feed=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting listing stream server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        upstream = %config.reso_api_url,
        configured = config.reso_access_token.is_some(),
        limiter_scope = %config.limiter_scope,
        spacing_ms = config.request_spacing.as_millis() as u64,
        "Configuration loaded"
    );

    // Build application
    let feed = build_feed(&config)?;
    let app = build_app(AppState::new(feed, config.max_total_ceiling))?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!(
        "Listing stream: http://localhost:{}/api/listings/stream?location=Los%20Angeles,%20CA",
        config.port
    );
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
