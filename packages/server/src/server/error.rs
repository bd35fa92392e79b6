use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use listing_feed::CriteriaError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned before a stream is opened.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidCriteria(#[from] CriteriaError),
    #[error("{field} must be a non-negative whole number, got `{value}`")]
    InvalidParam { field: &'static str, value: String },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
