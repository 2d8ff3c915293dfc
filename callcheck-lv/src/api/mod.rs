//! HTTP API handlers for callcheck-lv

pub mod health;
pub mod verify;

pub use health::health_routes;
pub use verify::{route_not_found, verify_routes};
