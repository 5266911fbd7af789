//! SQLite-backed counter
//!
//! The counter lives in the singleton row `counter(id = 1)`. Increments are a
//! single `UPDATE ... RETURNING` statement, so SQLite's write lock serializes
//! concurrent callers, including callers in other processes or other store
//! instances pointed at the same file. There is no in-process counter lock.
//!
//! ## Invariants
//! - `open()` only returns once the table exists and row 1 is seeded
//! - A failed increment leaves the stored count unchanged

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use r2d2::{ManageConnection, Pool};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::error::{PingPongError, Result};
use super::CounterStore;

const SCHEMA: &str = include_str!("schema.sql");

const INCREMENT_SQL: &str = "UPDATE counter SET count = count + 1 WHERE id = 1 RETURNING count";
const CURRENT_SQL: &str = "SELECT count FROM counter WHERE id = 1";

const DEFAULT_POOL_SIZE: usize = 8;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Counter stored in a SQLite database file
///
/// ## Concurrency
/// - `pool`: r2d2 pool; every connection gets `busy_timeout` and WAL mode
///   from the manager's init hook
/// - Counter updates are serialized by SQLite, not by this process
pub struct DatabaseBackedStore {
    /// Database file
    path: PathBuf,

    pool: Pool<SqliteConnectionManager>,
}

impl DatabaseBackedStore {
    /// Open with default pool size and busy timeout
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, DEFAULT_POOL_SIZE, DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// Open the database, create the counter table and seed row 1
    ///
    /// Any failure here is fatal for the caller: the store never falls back
    /// to an unpersisted zero.
    pub fn open_with(path: impl AsRef<Path>, pool_size: usize, busy_timeout_ms: u64) -> Result<Self> {
        let started_at = Instant::now();
        let path = path.as_ref().to_path_buf();
        tracing::info!("Opening counter database {}", path.display());

        let busy_timeout = Duration::from_millis(busy_timeout_ms);
        let manager = SqliteConnectionManager::file(&path).with_init(move |conn: &mut Connection| {
            conn.busy_timeout(busy_timeout)?;
            let _mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
            Ok(())
        });

        // Bootstrap on a direct connection so a bad path fails now with the
        // SQLite error instead of after the pool's connection timeout
        if let Err(e) = manager.connect().and_then(|conn| conn.execute_batch(SCHEMA)) {
            tracing::error!(
                "Failed to open counter database {} after {}ms: {}",
                path.display(),
                started_at.elapsed().as_millis(),
                e
            );
            return Err(e.into());
        }

        let max_size = u32::try_from(pool_size.max(1)).unwrap_or(u32::MAX);
        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(1))
            .connection_timeout(busy_timeout)
            .build(manager)?;

        tracing::info!(
            "Counter database {} ready in {}ms (pool size {})",
            path.display(),
            started_at.elapsed().as_millis(),
            max_size
        );

        Ok(Self { path, pool })
    }

    /// Convert a stored count, rejecting values no increment could produce
    fn to_count(value: i64) -> Result<u64> {
        u64::try_from(value)
            .map_err(|_| PingPongError::CorruptCounter(format!("negative count {}", value)))
    }

    /// Map a missing singleton row to a corrupt-counter error
    fn row_error(e: rusqlite::Error) -> PingPongError {
        match e {
            rusqlite::Error::QueryReturnedNoRows => {
                PingPongError::CorruptCounter("counter row id = 1 is missing".to_string())
            }
            other => PingPongError::Database(other),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of idle pooled connections
    pub fn idle_connections(&self) -> usize {
        self.pool.state().idle_connections as usize
    }
}

impl CounterStore for DatabaseBackedStore {
    fn increment(&self) -> Result<u64> {
        let conn = self.pool.get()?;
        let new_count: i64 = conn
            .prepare_cached(INCREMENT_SQL)?
            .query_row([], |row| row.get(0))
            .map_err(Self::row_error)?;

        // RETURNING yields the post-update value from the same statement, so
        // no other writer can land between the update and this subtraction.
        Self::to_count(new_count)?
            .checked_sub(1)
            .ok_or_else(|| PingPongError::CorruptCounter("count was negative before increment".to_string()))
    }

    fn current(&self) -> Result<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn
            .prepare_cached(CURRENT_SQL)?
            .query_row([], |row| row.get(0))
            .map_err(Self::row_error)?;
        Self::to_count(count)
    }

    fn kind(&self) -> &'static str {
        "database"
    }
}
