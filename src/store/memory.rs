//! In-memory counter
//!
//! RwLock-guarded counter with no persistence.

use parking_lot::RwLock;

use crate::error::{PingPongError, Result};
use super::CounterStore;

/// Counter held in process memory
///
/// State is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    count: RwLock<u64>,
}

impl InMemoryStore {
    /// Create a store starting at zero
    pub fn new() -> Self {
        Self::with_initial(0)
    }

    /// Create a store starting at `value`
    pub fn with_initial(value: u64) -> Self {
        Self {
            count: RwLock::new(value),
        }
    }
}

impl CounterStore for InMemoryStore {
    fn increment(&self) -> Result<u64> {
        let mut count = self.count.write();
        let previous = *count;
        *count = previous
            .checked_add(1)
            .ok_or(PingPongError::CounterOverflow(previous))?;
        Ok(previous)
    }

    fn current(&self) -> Result<u64> {
        Ok(*self.count.read())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
