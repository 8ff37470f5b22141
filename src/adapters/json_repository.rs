//! JSON file implementation of the value table repository.
//!
//! The file holds one object mapping each state key to its nine action
//! values. Keys are written in sorted order, so saving an unchanged table
//! reproduces the same bytes.

use std::path::{Path, PathBuf};

use super::{decode_or_empty, read_store, remove_store, write_store};
use crate::{Result, ports::ValueTableRepository, q_learning::ValueTable};

/// Value table stored as pretty-printed JSON in a single file.
///
/// # Examples
///
/// ```no_run
/// use qtictactoe::adapters::JsonFileRepository;
/// use qtictactoe::ports::ValueTableRepository;
///
/// let repo = JsonFileRepository::new("qtable-hard.json");
/// let table = repo.load()?;
/// repo.save(&table)?;
/// # Ok::<(), qtictactoe::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ValueTableRepository for JsonFileRepository {
    fn load(&self) -> Result<ValueTable> {
        let Some(bytes) = read_store(&self.path)? else {
            log::debug!("no value table at {:?}, starting empty", self.path);
            return Ok(ValueTable::new());
        };
        let source = self.path.display().to_string();
        Ok(decode_or_empty(&source, serde_json::from_slice(&bytes)))
    }

    fn save(&self, table: &ValueTable) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(table)?;
        write_store(&self.path, &bytes)
    }

    fn clear(&self) -> Result<()> {
        remove_store(&self.path)
    }
}
