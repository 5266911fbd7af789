//! Network Module
//!
//! HTTP server built on axum.
//!
//! ## Architecture
//! - tokio listener served by `axum::serve`, keep-alive and parsing by hyper
//! - Shared in-flight request limit, excess requests shed with 503
//! - Handlers call `PingPong`, which runs store calls off the async workers

mod routes;
mod server;

pub use routes::{build_router, CountBody};
pub use server::{Server, ShutdownHandle};
