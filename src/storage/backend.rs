//! Storage medium abstraction.
//!
//! This module defines the [`Storage`] trait: a string-valued key-value slot store,
//! the shape of browser local storage. The project store keeps its whole collection
//! under a single key, so a backend only has to read, replace and remove one value
//! at a time.
//!
//! The trait is injected into
//! [`ProjectStore`](crate::storage::ProjectStore), which lets tests substitute
//! [`MemoryStorage`](crate::storage::MemoryStorage) for the on-disk backend.

use crate::domain::error::Result;

/// A key-value medium holding string values.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): one JSON file on disk, atomic writes
/// - [`MemoryStorage`](crate::storage::MemoryStorage): in-process map with fault injection
///
/// # Examples
///
/// ```
/// use folio::storage::{MemoryStorage, Storage};
///
/// let mut storage = MemoryStorage::new();
/// storage.write("greeting", "hello")?;
/// assert_eq!(storage.read("greeting")?.as_deref(), Some("hello"));
/// # Ok::<(), folio::FolioError>(())
/// ```
pub trait Storage: Send {
    /// Whether the medium can be used at all.
    ///
    /// An unavailable medium rejects every read and write.
    fn is_available(&self) -> bool;

    /// Returns the value stored under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable or the read fails.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value under `key`.
    ///
    /// A failed write must leave the previous value readable.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable, full, or the write fails.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable or the removal fails.
    fn remove(&mut self, key: &str) -> Result<()>;
}
