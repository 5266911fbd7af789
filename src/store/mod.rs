//! Store Module
//!
//! The counter abstraction and its three backends.
//!
//! ## Contract
//! - `increment()` returns the value *before* this call's mutation
//! - `current()` returns the present value without mutating it
//! - N concurrent increments against one instance starting at `v0` return
//!   exactly `{v0, v0+1, ..., v0+N-1}`
//!
//! ## Backends
//! ```text
//! ┌────────────────┬───────────────────────┬──────────────────────────┐
//! │ Store          │ Serialized by         │ Persisted to             │
//! ├────────────────┼───────────────────────┼──────────────────────────┤
//! │ InMemoryStore  │ RwLock<u64>           │ nothing                  │
//! │ FileBackedStore│ RwLock<u64>           │ text file (best effort)  │
//! │ DatabaseStore  │ SQLite row write lock │ counter(id = 1) row      │
//! └────────────────┴───────────────────────┴──────────────────────────┘
//! ```

use std::sync::Arc;

use crate::config::{Backend, Config};
use crate::error::Result;

mod memory;
mod file;
mod database;

pub use memory::InMemoryStore;
pub use file::FileBackedStore;
pub use database::DatabaseBackedStore;

/// A shared counter that hands out each value exactly once
pub trait CounterStore: Send + Sync {
    /// Advance the counter by one, returning the value it held before
    fn increment(&self) -> Result<u64>;

    /// Read the counter without advancing it
    fn current(&self) -> Result<u64>;

    /// Short backend name for logging
    fn kind(&self) -> &'static str;
}

/// Open the store selected by `config.backend`
///
/// File stores never fail here (bad files fall back to zero). Database
/// stores fail if the database can't be opened or its schema initialized.
pub fn open(config: &Config) -> Result<Arc<dyn CounterStore>> {
    config.validate()?;

    let store: Arc<dyn CounterStore> = match &config.backend {
        Backend::Memory => Arc::new(InMemoryStore::new()),
        Backend::File { path } => Arc::new(FileBackedStore::open(path, config.file_write_mode)),
        Backend::Database { path } => Arc::new(DatabaseBackedStore::open_with(
            path,
            config.db_pool_size,
            config.db_busy_timeout_ms,
        )?),
    };

    tracing::info!("Opened {} counter store", store.kind());
    Ok(store)
}
