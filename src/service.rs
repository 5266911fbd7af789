//! Service Module
//!
//! Maps HTTP handlers onto counter store operations.
//!
//! ## Responsibilities
//! - Own the injected counter store
//! - Run store calls on tokio's blocking pool; stores may sleep on SQLite
//!   locks or do file I/O under their write lock

use std::sync::Arc;

use crate::error::Result;
use crate::store::CounterStore;

/// The ping/pong service
///
/// Cheap to clone; every clone shares the same store.
#[derive(Clone)]
pub struct PingPong {
    store: Arc<dyn CounterStore>,
}

impl PingPong {
    /// Wrap a store
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Increment and return the previous value
    pub async fn ping(&self) -> Result<u64> {
        let store = Arc::clone(&self.store);
        let previous = tokio::task::spawn_blocking(move || store.increment()).await??;
        tracing::trace!("pong {}", previous);
        Ok(previous)
    }

    /// Current value, without incrementing
    pub async fn count(&self) -> Result<u64> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.current()).await?
    }

    /// The backing store
    pub fn store(&self) -> &Arc<dyn CounterStore> {
        &self.store
    }
}
