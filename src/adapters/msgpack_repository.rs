//! MessagePack implementation of the value table repository.
//!
//! Same logical shape as the JSON store, in a compact binary encoding.

use std::path::{Path, PathBuf};

use super::{decode_or_empty, read_store, remove_store, write_store};
use crate::{Result, error::Error, ports::ValueTableRepository, q_learning::ValueTable};

/// MessagePack-based value table repository.
///
/// # Examples
///
/// ```no_run
/// use qtictactoe::adapters::MsgPackRepository;
/// use qtictactoe::ports::ValueTableRepository;
///
/// let repo = MsgPackRepository::new("qtable-hard.msgpack");
/// let table = repo.load()?;
/// repo.save(&table)?;
/// # Ok::<(), qtictactoe::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgPackRepository {
    path: PathBuf,
}

impl MsgPackRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ValueTableRepository for MsgPackRepository {
    fn load(&self) -> Result<ValueTable> {
        let Some(bytes) = read_store(&self.path)? else {
            return Ok(ValueTable::new());
        };
        let source = self.path.display().to_string();
        Ok(decode_or_empty(&source, rmp_serde::from_slice(&bytes)))
    }

    fn save(&self, table: &ValueTable) -> Result<()> {
        let bytes = rmp_serde::to_vec(table).map_err(|e| Error::SerializationContext {
            operation: "serialize value table to MessagePack".to_string(),
            message: e.to_string(),
        })?;
        write_store(&self.path, &bytes)
    }

    fn clear(&self) -> Result<()> {
        remove_store(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::types::StateKey;

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path().join("qtable.msgpack"));

        let mut table = ValueTable::new();
        let key: StateKey = "XO_______".parse().unwrap();
        table.set(&key, 8, -0.5);

        repo.save(&table).expect("Failed to save");
        assert_eq!(repo.load().expect("Failed to load"), table);
    }

    #[test]
    fn test_load_garbage_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("qtable.msgpack");
        fs::write(&path, [0xc1, 0xff, 0x00]).unwrap();

        let repo = MsgPackRepository::new(&path);
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_unreadable_path_returns_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        // A directory cannot be read as a file
        let repo = MsgPackRepository::new(temp_dir.path());
        assert!(repo.load().is_err());
    }
}
