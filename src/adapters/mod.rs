//! Adapters implementing domain ports.
//!
//! This module contains storage implementations of the traits defined in the
//! ports module. Adapters depend on the ports, not the other way around.

pub mod in_memory_repository;
pub mod json_repository;
pub mod msgpack_repository;

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;

pub use in_memory_repository::InMemoryRepository;
pub use json_repository::JsonFileRepository;
pub use msgpack_repository::MsgPackRepository;

use crate::{Result, error::Error, q_learning::ValueTable};

/// Read a store file, treating a missing file as "nothing stored"
fn read_store(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Io {
            operation: format!("read value table {path:?}"),
            source,
        }),
    }
}

/// Replace a store file, creating missing parent directories.
///
/// The bytes go to a temporary file in the same directory that is then
/// renamed over `path`, so readers see either the old table or the new one.
fn write_store(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
            parent
        }
        None => Path::new("."),
    };

    let write_error = |source: io::Error| Error::Io {
        operation: format!("write value table {path:?}"),
        source,
    };
    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Delete a store file; a file that is already gone is not an error
fn remove_store(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Io {
            operation: format!("remove value table {path:?}"),
            source,
        }),
    }
}

/// Decode a stored payload, falling back to an empty table when it is corrupt
fn decode_or_empty<E: std::fmt::Display>(
    source: &str,
    decoded: std::result::Result<ValueTable, E>,
) -> ValueTable {
    match decoded {
        Ok(table) => table,
        Err(e) => {
            log::warn!("discarding unreadable value table in {source}: {e}");
            ValueTable::new()
        }
    }
}
