//! Lead verification endpoint
//!
//! `POST /callVerification` with a JSON lead body and the authorization token
//! in the `token` header. The handler validates the input, drives one pipeline
//! run, and renders the classified outcome.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use callcheck_common::Error;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiResult;
use crate::models::LeadRequest;
use crate::pipeline::{validate, Pipeline};
use crate::AppState;

/// Header carrying the caller's Basic authorization token
const TOKEN_HEADER: &str = "token";

/// Acceptance response body
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub outcome: String,
}

/// POST /callVerification
pub async fn call_verification(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<VerifyResponse>> {
    let Json(value) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected unparseable request body");
        Error::MalformedBody
    })?;

    // A well-formed body that is not an object (array, string, number) fails
    // validation, not parsing
    if !value.is_object() {
        return Err(Error::InvalidInput.into());
    }

    let lead: LeadRequest = serde_json::from_value(value).map_err(|e| {
        tracing::debug!(error = %e, "Request body did not match the lead shape");
        Error::MalformedBody
    })?;

    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    validate(token, &lead)?;

    let pipeline = Pipeline::new(state.config.clone(), state.gateway.clone());
    pipeline.run(token, lead).await?;

    Ok(Json(VerifyResponse {
        outcome: "Lead Accepted".to_string(),
    }))
}

/// Fallback for every unrouted path and method
pub async fn route_not_found() -> ApiResult<()> {
    Err(Error::RouteNotFound.into())
}

/// Build verification routes
pub fn verify_routes() -> Router<AppState> {
    Router::new().route("/callVerification", post(call_verification))
}
