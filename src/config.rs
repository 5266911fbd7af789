//! Configuration for pingpong
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{PingPongError, Result};

/// Main configuration for a pingpong instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Which counter store backs the service
    pub backend: Backend,

    /// How the file-backed store writes the counter file
    pub file_write_mode: FileWriteMode,

    // -------------------------------------------------------------------------
    // Database Configuration
    // -------------------------------------------------------------------------
    /// Max pooled SQLite connections
    pub db_pool_size: usize,

    /// How long a connection waits on a locked database (milliseconds)
    pub db_busy_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max requests in flight; excess requests are shed with 503
    pub max_concurrent_requests: usize,

    /// Per-request deadline (milliseconds); slower requests get 408
    pub request_timeout_ms: u64,
}

/// Counter store selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Process memory only, lost on restart
    Memory,

    /// Decimal counter in a text file
    File { path: PathBuf },

    /// Singleton row in a SQLite database
    Database { path: PathBuf },
}

/// How the counter file is rewritten after each increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileWriteMode {
    /// Truncate and write the file in place
    Overwrite,

    /// Write a sibling temp file, fsync it, then rename it over the target
    AtomicRename,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            file_write_mode: FileWriteMode::AtomicRename,
            db_pool_size: 8,
            db_busy_timeout_ms: 5000,
            listen_addr: "0.0.0.0:3000".to_string(),
            max_concurrent_requests: 1024,
            request_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.db_pool_size == 0 {
            return Err(PingPongError::Config(
                "db_pool_size must be at least 1".to_string(),
            ));
        }
        if self.listen_addr.trim().is_empty() {
            return Err(PingPongError::Config(
                "listen_addr must not be empty".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(PingPongError::Config(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(PingPongError::Config(
                "request_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Keep the counter in memory only
    pub fn memory(mut self) -> Self {
        self.config.backend = Backend::Memory;
        self
    }

    /// Persist the counter to a text file
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.backend = Backend::File { path: path.into() };
        self
    }

    /// Persist the counter to a SQLite database
    pub fn database(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.backend = Backend::Database { path: path.into() };
        self
    }

    /// Set the counter file write mode
    pub fn file_write_mode(mut self, mode: FileWriteMode) -> Self {
        self.config.file_write_mode = mode;
        self
    }

    /// Set the database connection pool size
    pub fn db_pool_size(mut self, size: usize) -> Self {
        self.config.db_pool_size = size;
        self
    }

    /// Set the database busy timeout (in milliseconds)
    pub fn db_busy_timeout_ms(mut self, ms: u64) -> Self {
        self.config.db_busy_timeout_ms = ms;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of requests in flight
    pub fn max_concurrent_requests(mut self, count: usize) -> Self {
        self.config.max_concurrent_requests = count;
        self
    }

    /// Set the per-request timeout (in milliseconds)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
