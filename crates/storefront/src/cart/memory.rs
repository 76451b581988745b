//! In-memory cart storage.
//!
//! Used by tests and single-process tools. Shares its record across clones
//! so a test can observe what a store persisted, and can be switched into a
//! failing mode to exercise the degraded-durability path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use azahar_core::CartRecord;

use super::{CartStorage, StorageError};

/// Cart storage backed by process memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryCartStorage {
    record: Arc<Mutex<Option<CartRecord>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryCartStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail, simulating a full or broken backend.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The currently stored record, if any.
    #[must_use]
    pub fn stored(&self) -> Option<CartRecord> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartStorage for MemoryCartStorage {
    async fn load(&self) -> Result<Option<CartRecord>, StorageError> {
        Ok(self.stored())
    }

    async fn save(&self, record: &CartRecord) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError("write failure injected".to_string()));
        }
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.clone());
        Ok(())
    }
}
