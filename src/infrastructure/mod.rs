//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where folio keeps its data, configuration and trace files, and opens
//! the on-disk storage medium at that location.

pub mod paths;

pub use paths::{expand_tilde, get_config_file, get_data_dir};

use crate::domain::error::Result;
use crate::storage::JsonStorage;
use std::path::Path;

/// Opens the JSON storage medium inside `data_dir`.
///
/// A corrupt storage file is set aside and replaced by empty storage.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the storage file
/// cannot be read or moved.
pub fn open_storage(data_dir: &Path) -> Result<JsonStorage> {
    JsonStorage::open_or_recover(data_dir.join(paths::STORAGE_FILE))
}
