//! HTTP rendering for the outcome taxonomy
//!
//! Every response this service produces, success or failure, is the same
//! shape: `{"outcome": <text>}` with the taxonomy's numeric class as the HTTP
//! status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error carrying a classified outcome
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub callcheck_common::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(json!({ "outcome": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
