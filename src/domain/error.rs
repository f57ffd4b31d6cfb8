//! Error types for folio.
//!
//! This module defines the centralized error type [`FolioError`] and a type alias
//! [`Result`] used throughout the crate. Storage-layer variants are normally caught
//! at the store boundary and logged; the validation, not-found and invalid-size
//! variants are meant to reach the caller so a front end can show them to the user.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The main error type for catalog operations.
///
/// # Examples
///
/// ```
/// use folio::domain::FolioError;
///
/// fn lookup(id: u64) -> Result<(), FolioError> {
///     Err(FolioError::NotFound(id))
/// }
///
/// assert_eq!(lookup(7).unwrap_err().to_string(), "Project not found: 7");
/// ```
#[derive(Debug, Error)]
pub enum FolioError {
    /// No persistent medium is available in the current context.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Writing to the storage medium failed (quota, rename, ...).
    #[error("Storage error: {0}")]
    Storage(String),

    /// The stored payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No project with the given id exists.
    #[error("Project not found: {0}")]
    NotFound(u64),

    /// The selected image size is not one of the known sizes.
    #[error("Invalid image size: {0}")]
    InvalidSize(String),

    /// One or more fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Per-field validation messages, keyed by field name.
///
/// Ordered by field name so messages render deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts to `Ok(())` when empty, otherwise a [`FolioError::Validation`].
    ///
    /// # Errors
    ///
    /// Returns the collected errors when at least one field failed.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(FolioError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// A specialized `Result` type for folio operations.
pub type Result<T> = std::result::Result<T, FolioError>;
