//! Error types for pingpong
//!
//! Provides a unified error type for all operations.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Result type alias using PingPongError
pub type Result<T> = std::result::Result<T, PingPongError>;

/// Unified error type for pingpong operations
#[derive(Debug, Error)]
pub enum PingPongError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt counter: {0}")]
    CorruptCounter(String),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Counter overflow at {0}")]
    CounterOverflow(u64),

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Store failures reach the client as a bare 500; the detail is only logged
impl IntoResponse for PingPongError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
    }
}
