//! Repository port for value table persistence.
//!
//! This module defines the trait boundary between the learning core and the
//! storage medium that keeps value tables between runs.

use crate::{Result, q_learning::ValueTable};

/// Port for persisting and loading a value table.
///
/// A repository is bound to one storage location (a file, a slot in memory,
/// ...). The persisted shape is always a map from state key to a nine-element
/// number array; the medium is up to the adapter.
///
/// # Examples
///
/// ```
/// use qtictactoe::adapters::InMemoryRepository;
/// use qtictactoe::ports::ValueTableRepository;
/// use qtictactoe::q_learning::ValueTable;
///
/// let repo = InMemoryRepository::new();
///
/// // Nothing stored yet: an empty table, not an error
/// let table = repo.load()?;
/// assert!(table.is_empty());
///
/// repo.save(&table)?;
/// repo.clear()?;
/// # Ok::<(), qtictactoe::Error>(())
/// ```
pub trait ValueTableRepository {
    /// Load the stored table.
    ///
    /// Returns an empty table when nothing has been stored or when the stored
    /// payload cannot be parsed. A corrupt store must never block training or
    /// play.
    ///
    /// # Errors
    ///
    /// Only I/O failures other than "not found" are returned.
    fn load(&self) -> Result<ValueTable>;

    /// Replace the stored table.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn save(&self, table: &ValueTable) -> Result<()>;

    /// Remove the stored table. A following [`load`](Self::load) yields an
    /// empty table.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be removed.
    fn clear(&self) -> Result<()>;
}
