//! callcheck-lv library interface
//!
//! Exposes the router and application state for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use callcheck_common::AppConfig;
use std::sync::Arc;

use crate::services::Gateway;

/// Application state shared across handlers
///
/// Everything here is read-only for the life of the process; concurrent
/// verification runs share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn Gateway>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, gateway: Arc<dyn Gateway>) -> Self {
        Self { config, gateway }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::verify_routes())
        .merge(api::health_routes())
        .fallback(api::route_not_found)
        .with_state(state)
}
