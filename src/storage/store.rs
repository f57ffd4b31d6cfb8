//! Whole-collection persistence for project records.
//!
//! [`ProjectStore`] keeps every record as one JSON array under a single key of a
//! [`Storage`] medium. It is the durability boundary of the catalog: reads that fail
//! for any reason (no medium, no value, corrupt payload) yield the default
//! collection, and writes that fail are logged and dropped. Callers that need to
//! observe a failure use the `try_` variants.

use crate::domain::error::{FolioError, Result};
use crate::domain::project::ProjectRecord;
use crate::storage::backend::Storage;

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "userProjects";

/// The collection a fresh or reset store holds.
#[must_use]
pub const fn default_projects() -> Vec<ProjectRecord> {
    Vec::new()
}

/// Persists the record collection through an injected storage medium.
///
/// # Examples
///
/// ```
/// use folio::storage::{MemoryStorage, ProjectStore};
///
/// let mut store = ProjectStore::new(MemoryStorage::new());
/// assert!(store.load().is_empty());
/// store.reset();
/// assert!(store.load().is_empty());
/// ```
#[derive(Debug)]
pub struct ProjectStore<S> {
    storage: S,
    key: String,
}

impl<S: Storage> ProjectStore<S> {
    /// Creates a store using [`DEFAULT_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Reads the persisted collection, surfacing every failure.
    ///
    /// An absent value is not a failure and yields the default collection.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::StorageUnavailable`] without a medium, the medium's
    /// read error, or [`FolioError::Serialization`] for a payload that is not a
    /// valid record array.
    pub fn try_load(&self) -> Result<Vec<ProjectRecord>> {
        if !self.storage.is_available() {
            return Err(FolioError::StorageUnavailable(
                "no persistent storage in this context".to_string(),
            ));
        }

        match self.storage.read(&self.key)? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(default_projects()),
        }
    }

    /// Returns the persisted collection, or the default collection on any failure.
    pub fn load(&self) -> Vec<ProjectRecord> {
        let _span = tracing::debug_span!("store_load", key = %self.key).entered();

        match self.try_load() {
            Ok(records) => {
                tracing::debug!(count = records.len(), "loaded projects");
                records
            }
            Err(FolioError::StorageUnavailable(reason)) => {
                tracing::debug!(%reason, "storage unavailable, using default projects");
                default_projects()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load projects, using default projects");
                default_projects()
            }
        }
    }

    /// Replaces the persisted collection with `records` in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable, serialization fails, or the
    /// write is rejected. The previous collection stays readable in every case.
    pub fn try_save_all(&mut self, records: &[ProjectRecord]) -> Result<()> {
        if !self.storage.is_available() {
            return Err(FolioError::StorageUnavailable(
                "no persistent storage in this context".to_string(),
            ));
        }

        let payload = serde_json::to_string(records)?;
        self.storage.write(&self.key, &payload)
    }

    /// Replaces the persisted collection, logging and dropping any failure.
    pub fn save_all(&mut self, records: &[ProjectRecord]) {
        let _span = tracing::debug_span!("store_save_all", key = %self.key, count = records.len()).entered();

        match self.try_save_all(records) {
            Ok(()) => tracing::debug!("projects saved"),
            Err(e) => tracing::warn!(error = %e, "failed to save projects"),
        }
    }

    /// Removes the stored collection, surfacing failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable or the removal fails.
    pub fn try_reset(&mut self) -> Result<()> {
        if !self.storage.is_available() {
            return Err(FolioError::StorageUnavailable(
                "no persistent storage in this context".to_string(),
            ));
        }
        self.storage.remove(&self.key)
    }

    /// Restores the default collection.
    pub fn reset(&mut self) {
        let _span = tracing::debug_span!("store_reset", key = %self.key).entered();

        match self.try_reset() {
            Ok(()) => tracing::debug!("projects reset to defaults"),
            Err(e) => tracing::warn!(error = %e, "failed to reset projects"),
        }
    }
}
