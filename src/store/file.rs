//! File-backed counter
//!
//! Same locking as the in-memory store, plus a rewrite of the counter file
//! after every increment.
//!
//! ## Failure policy
//! - Missing file at startup: start at 0
//! - Unreadable or unparsable file at startup: start at 0 with a warning
//! - Failed write after an increment: log, count the failure, keep serving.
//!   Memory and disk disagree until the next successful write; a crash in
//!   that window loses the unflushed increments.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::config::FileWriteMode;
use crate::error::{PingPongError, Result};
use super::CounterStore;

/// Counter mirrored to a text file holding its decimal value
#[derive(Debug)]
pub struct FileBackedStore {
    /// Target counter file
    path: PathBuf,

    /// How each increment rewrites `path`
    write_mode: FileWriteMode,

    /// In-memory value; the write lock is held across the file write
    count: RwLock<u64>,

    /// Writes that failed and were swallowed
    persist_failures: AtomicU64,
}

impl FileBackedStore {
    /// Open a store backed by `path`, restoring the persisted value if any
    pub fn open(path: impl AsRef<Path>, write_mode: FileWriteMode) -> Self {
        let path = path.as_ref().to_path_buf();
        let initial = Self::restore(&path);

        tracing::info!(
            "File counter at {} starting at {}",
            path.display(),
            initial
        );

        Self {
            path,
            write_mode,
            count: RwLock::new(initial),
            persist_failures: AtomicU64::new(0),
        }
    }

    /// Read the persisted value, falling back to zero
    fn restore(path: &Path) -> u64 {
        match fs::read_to_string(path) {
            Ok(contents) => match contents.trim().parse::<u64>() {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(
                        "Counter file {} is not a valid counter ({}), starting at 0",
                        path.display(),
                        e
                    );
                    0
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No counter file at {}, starting at 0", path.display());
                0
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read counter file {} ({}), starting at 0",
                    path.display(),
                    e
                );
                0
            }
        }
    }

    /// Write `value` to the counter file using the configured mode
    fn persist(&self, value: u64) -> io::Result<()> {
        let contents = value.to_string();
        match self.write_mode {
            FileWriteMode::Overwrite => fs::write(&self.path, contents),
            FileWriteMode::AtomicRename => {
                let tmp_path = self.tmp_path();
                {
                    let mut file = File::create(&tmp_path)?;
                    file.write_all(contents.as_bytes())?;
                    file.sync_all()?;
                }
                fs::rename(&tmp_path, &self.path)
            }
        }
    }

    /// Sibling temp file used by `AtomicRename`
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Path of the counter file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured write mode
    pub fn write_mode(&self) -> FileWriteMode {
        self.write_mode
    }

    /// Number of increments whose file write failed
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures.load(Ordering::Relaxed)
    }
}

impl CounterStore for FileBackedStore {
    fn increment(&self) -> Result<u64> {
        let mut count = self.count.write();
        let previous = *count;
        let next = previous
            .checked_add(1)
            .ok_or(PingPongError::CounterOverflow(previous))?;
        *count = next;

        if let Err(e) = self.persist(next) {
            self.persist_failures.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                "Failed to persist counter {} to {}: {}",
                next,
                self.path.display(),
                e
            );
        }

        Ok(previous)
    }

    fn current(&self) -> Result<u64> {
        Ok(*self.count.read())
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}
