//! HTTP routes
//!
//! `/count` reads, `/healthz` answers liveness, and every other path and
//! method increments. Every route sits behind one shared in-flight limit.

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::any;
use axum::{BoxError, Json, Router};
use serde::{Deserialize, Serialize};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::load_shed::error::Overloaded;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::Config;
use crate::error::Result;
use crate::service::PingPong;

/// JSON body of `/count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBody {
    pub count: u64,
}

async fn ping(State(service): State<PingPong>) -> Result<String> {
    Ok(format!("pong {}", service.ping().await?))
}

async fn count(State(service): State<PingPong>) -> Result<Json<CountBody>> {
    let count = service.count().await?;
    Ok(Json(CountBody { count }))
}

async fn health() -> &'static str {
    "ok"
}

/// Requests shed at the in-flight limit get 503; nothing else reaches here
async fn handle_overload(err: BoxError) -> (StatusCode, &'static str) {
    if err.is::<Overloaded>() {
        tracing::warn!("Request limit reached, shedding request");
        (StatusCode::SERVICE_UNAVAILABLE, "Too many requests")
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    }
}

/// Build the application router over `service`
pub fn build_router(service: PingPong, config: &Config) -> Router {
    Router::new()
        .route("/count", any(count))
        .route("/healthz", any(health))
        .fallback(ping)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_overload))
                .load_shed()
                .layer(GlobalConcurrencyLimitLayer::new(config.max_concurrent_requests)),
        )
        .layer(TimeoutLayer::new(Duration::from_millis(config.request_timeout_ms)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .with_state(service)
}
