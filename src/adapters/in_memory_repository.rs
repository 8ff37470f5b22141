//! In-memory value table repository for testing.
//!
//! This adapter stores the serialized table in memory, enabling fast tests
//! without any file system I/O. The payload goes through the same JSON
//! encoding as the file store, so corrupt-payload handling can be exercised.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::decode_or_empty;
use crate::{Result, ports::ValueTableRepository, q_learning::ValueTable};

/// In-memory repository for testing.
///
/// # Examples
///
/// ```
/// use qtictactoe::adapters::InMemoryRepository;
/// use qtictactoe::ports::ValueTableRepository;
/// use qtictactoe::q_learning::ValueTable;
///
/// let repo = InMemoryRepository::new();
/// repo.save(&ValueTable::new())?;
/// assert!(repo.contains());
/// # Ok::<(), qtictactoe::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying slot, so a clone handed to a trainer
/// can be inspected afterwards through the original.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<Option<Vec<u8>>>>,
    saves: Arc<Mutex<usize>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a payload is currently stored
    pub fn contains(&self) -> bool {
        self.slot().is_some()
    }

    /// Number of successful saves since creation
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the stored payload with arbitrary bytes
    pub fn put_raw(&self, bytes: impl Into<Vec<u8>>) {
        *self.slot() = Some(bytes.into());
    }

    fn slot(&self) -> MutexGuard<'_, Option<Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ValueTableRepository for InMemoryRepository {
    fn load(&self) -> Result<ValueTable> {
        let slot = self.slot();
        let Some(bytes) = slot.as_deref() else {
            return Ok(ValueTable::new());
        };
        Ok(decode_or_empty("memory", serde_json::from_slice(bytes)))
    }

    fn save(&self, table: &ValueTable) -> Result<()> {
        let bytes = serde_json::to_vec(table)?;
        *self.slot() = Some(bytes);
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}
