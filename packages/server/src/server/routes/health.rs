use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    upstream_configured: bool,
    limiter_scope: String,
}

/// Health check endpoint
///
/// Always 200: without upstream credentials the service still answers
/// every search with demo listings.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        upstream_configured: state.feed.is_configured(),
        limiter_scope: state.feed.limiter_scope().to_string(),
    })
}
