//! In-memory storage backend.
//!
//! Holds slots in a map for the lifetime of the value. Besides being the test
//! double for [`JsonStorage`](crate::storage::JsonStorage), it can simulate the
//! failure modes of a browser medium: no storage at all, and a size quota.

use crate::domain::error::{FolioError, Result};
use crate::storage::backend::Storage;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    available: bool,
    /// Maximum total bytes of keys and values.
    quota_bytes: Option<usize>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            available: true,
            quota_bytes: None,
        }
    }

    /// A medium that rejects every operation, like a context without local storage.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Limits the combined size of all keys and values.
    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Stores `value` directly, bypassing availability and quota checks.
    ///
    /// Useful for seeding payloads the store itself would never write.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(FolioError::StorageUnavailable(
                "in-memory medium is disabled".to_string(),
            ))
        }
    }
}

impl Storage for MemoryStorage {
    fn is_available(&self) -> bool {
        self.available
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        self.ensure_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_available()?;

        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(FolioError::Storage(format!(
                    "quota exceeded: {needed} bytes over a limit of {quota}"
                )));
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.ensure_available()?;
        self.entries.remove(key);
        Ok(())
    }
}
