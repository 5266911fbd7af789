//! HTTP Server
//!
//! Binds the listener and serves the router until shut down.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::config::Config;
use crate::error::{PingPongError, Result};
use crate::service::PingPong;

use super::routes::build_router;

/// HTTP server for the ping/pong service
pub struct Server {
    config: Config,
    service: PingPong,
    listener: TcpListener,

    /// Flipped to `true` to start a graceful shutdown
    shutdown: Arc<watch::Sender<bool>>,
}

/// Cloneable handle that stops a running server
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Stop accepting connections and let in-flight requests finish
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }
}

impl Server {
    /// Bind the listen address from `config`
    pub async fn bind(config: Config, service: PingPong) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(config.listen_addr.as_str()).await.map_err(|e| {
            PingPongError::Network(format!("Failed to bind {}: {}", config.listen_addr, e))
        })?;
        let (tx, _rx) = watch::channel(false);

        Ok(Self {
            config,
            service,
            listener,
            shutdown: Arc::new(tx),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping the server from another task
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: Arc::clone(&self.shutdown),
        }
    }

    /// Serve until a `ShutdownHandle` fires
    pub async fn run(self) -> Result<()> {
        tracing::info!(
            "Listening on {} (max {} requests in flight)",
            self.local_addr()?,
            self.config.max_concurrent_requests
        );

        let app = build_router(self.service, &self.config);
        let shutdown = self.shutdown;
        let mut stop = shutdown.subscribe();

        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move {
                // The sender outlives this future, so this only returns on shutdown
                let _ = stop.wait_for(|stopping| *stopping).await;
                tracing::info!("Shutdown requested, draining in-flight requests");
            })
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}
