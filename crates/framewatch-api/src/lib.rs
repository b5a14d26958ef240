//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video discovery and analysis retrieval endpoints
//! - Byte-range media and thumbnail streaming
//! - Permissive CORS for the front end

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
