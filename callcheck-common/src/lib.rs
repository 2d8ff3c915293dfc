//! # Callcheck Common Library
//!
//! Shared code for the callcheck services:
//! - Outcome taxonomy (classified verification results)
//! - Configuration loading and resolution

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{Error, Result};
