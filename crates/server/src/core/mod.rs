//! Core Service Layer
//!
//! Shared infrastructure for the social server: authentication,
//! configuration, database, errors and routing.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod db;
pub mod error;
pub mod router;
pub mod store;

use axum::Json;
use serde_json::{json, Value};

// Re-exports for convenience
pub use config::{AppState, ServerConfig};
pub use ctx::Ctx;
pub use error::{Error, Result};
pub use router::router;

/// `{"message": "SUCCESS"}`
pub fn success() -> Json<Value> {
    Json(json!({ "message": "SUCCESS" }))
}
