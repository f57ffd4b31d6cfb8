//! JSON file-based storage backend.
//!
//! All slots live in one human-readable JSON file that is loaded into memory when
//! the backend opens and rewritten in full on every change. Writes go to a temporary
//! file first and are then renamed over the target, so a crash never leaves a
//! half-written file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "userProjects": "[{\"id\":1,\"title\":\"Poster\", ...}]"
//!   }
//! }
//! ```

use crate::domain::error::{FolioError, Result};
use crate::storage::backend::Storage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current version of the file layout.
const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the file layout for future migrations.
    version: u32,

    /// Slot values keyed by slot name.
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// This type is `Send` but not `Sync`; one process owns one handle at a time.
/// Two processes writing the same file race with last-writer-wins.
#[derive(Debug)]
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the file, loaded on open.
    data: StorageData,

    /// Optional cap on the serialized file size in bytes.
    quota_bytes: Option<usize>,
}

impl JsonStorage {
    /// Opens the backend at `file_path`, creating parent directories as needed.
    ///
    /// A missing file is treated as empty storage; the file is only created on the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but cannot be read
    /// - The file exists but is not a valid storage document
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use folio::storage::JsonStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonStorage::open(PathBuf::from("/tmp/folio/storage.json"))?;
    /// # Ok::<(), folio::FolioError>(())
    /// ```
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON storage");

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no storage file yet, starting empty");
            StorageData::default()
        };

        tracing::debug!(entries = data.entries.len(), "storage opened");

        Ok(Self {
            file_path,
            data,
            quota_bytes: None,
        })
    }

    /// Opens the backend like [`JsonStorage::open`], but sets an unparsable file
    /// aside as `<name>.corrupt` and starts empty instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the file cannot be
    /// read, or the corrupt file cannot be moved out of the way.
    pub fn open_or_recover(file_path: PathBuf) -> Result<Self> {
        match Self::open(file_path.clone()) {
            Err(err) if Self::is_corrupt(&err) => {
                let reason = err.to_string();
                let corrupt_path = file_path.with_extension("json.corrupt");
                tracing::warn!(
                    path = ?file_path,
                    moved_to = ?corrupt_path,
                    %reason,
                    "storage file is corrupt, starting empty"
                );
                std::fs::rename(&file_path, &corrupt_path)?;
                Self::open(file_path)
            }
            other => other,
        }
    }

    /// Whether an `open` failure means the file content is unusable.
    ///
    /// Covers documents that fail to parse and files that are not valid UTF-8.
    fn is_corrupt(err: &FolioError) -> bool {
        match err {
            FolioError::Storage(_) => true,
            FolioError::Io(e) => e.kind() == std::io::ErrorKind::InvalidData,
            _ => false,
        }
    }

    /// Caps the serialized file size; writes that would exceed it fail.
    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(StorageData::default());
        }

        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| FolioError::Storage(format!("failed to parse storage file: {e}")))?;

        if data.version > FORMAT_VERSION {
            tracing::warn!(
                version = data.version,
                supported = FORMAT_VERSION,
                "storage file written by a newer version"
            );
        }

        Ok(data)
    }

    /// Serializes `data` and atomically replaces the file with it.
    fn save_to_file(&self, data: &StorageData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;

        if let Some(quota) = self.quota_bytes {
            if json.len() > quota {
                return Err(FolioError::Storage(format!(
                    "quota exceeded: {} bytes over a limit of {quota}",
                    json.len()
                )));
            }
        }

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;

        tracing::trace!("renaming temporary file to final location");
        if let Err(e) = std::fs::rename(&tmp_path, &self.file_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        Ok(())
    }

    /// Applies `change` to a copy of the data and commits it only if the save works.
    fn commit(&mut self, change: impl FnOnce(&mut StorageData)) -> Result<()> {
        let mut next = self.data.clone();
        change(&mut next);
        self.save_to_file(&next)?;
        self.data = next;
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn is_available(&self) -> bool {
        true
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self.data.entries.get(key).cloned();
        tracing::trace!(key, found = value.is_some(), "read slot");
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_write", key, bytes = value.len()).entered();

        self.commit(|data| {
            data.entries.insert(key.to_string(), value.to_string());
        })?;

        tracing::debug!("slot written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_remove", key).entered();

        if !self.data.entries.contains_key(key) {
            return Ok(());
        }

        self.commit(|data| {
            data.entries.remove(key);
        })?;

        tracing::debug!("slot removed");
        Ok(())
    }
}
