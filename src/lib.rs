//! # pingpong
//!
//! A ping/pong counter service with:
//! - One shared counter, handed out exactly once per request
//! - Three interchangeable stores: in-memory, file-backed, SQLite-backed
//! - axum HTTP server with a shared in-flight request limit
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 HTTP Server (axum)                           │
//! │        load shed + in-flight limit + timeout + trace         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  PingPong Service                            │
//! │      any path → increment     /count → current               │
//! │          store calls run on the blocking pool                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Arc<dyn CounterStore>
//!          ┌────────────┼─────────────────┐
//!          ▼            ▼                 ▼
//!   ┌────────────┐ ┌────────────┐ ┌──────────────┐
//!   │  InMemory  │ │ FileBacked │ │  Database    │
//!   │  (RwLock)  │ │ (RwLock +  │ │ (SQLite row  │
//!   │            │ │   file)    │ │   update)    │
//!   └────────────┘ └────────────┘ └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod service;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PingPongError, Result};
pub use config::Config;
pub use store::{CounterStore, DatabaseBackedStore, FileBackedStore, InMemoryStore};
pub use service::PingPong;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pingpong
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
