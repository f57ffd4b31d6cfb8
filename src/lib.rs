//! folio: a portfolio project catalog.
//!
//! folio keeps a list of portfolio projects and provides:
//! - Create, update, delete and reset of project records
//! - Persistence of the whole list as one JSON value in a local key-value medium
//! - Display ordering: explicitly prioritized projects first, the rest shuffled
//! - Form validation against the fixed categories, image sizes and priority levels
//! - Category filtering and fuzzy title search
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Admin CLI (main.rs)                                │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ Request / Response
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Request dispatch                                 │
//! │  - Catalog: upsert / remove / list / reset / search │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage Layer (storage/)                           │
//! │  - ProjectStore: whole-collection load/save/reset   │
//! │  - Storage media: JSON file, in-memory              │
//! │  - Display ordering                                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Records, patches, reference data (domain/)       │
//! │  - Validation and error types (domain/)             │
//! │  - Data and config paths (infrastructure/)          │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber, optional span export         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Optional TOML file (`~/.config/folio/folio.toml` or `--config`):
//!
//! ```toml
//! data_dir = "~/portfolio-data"
//! storage_key = "userProjects"
//! trace_level = "info"
//! trace_export = true
//! trace_max_bytes = 1048576
//! trace_backups = 2
//! ```
//!
//! # Example
//!
//! ```rust
//! use folio::app::Catalog;
//! use folio::domain::{ImageInfo, ProjectPatch};
//! use folio::storage::MemoryStorage;
//!
//! let mut catalog = Catalog::with_storage(MemoryStorage::new());
//! catalog.upsert(ProjectPatch::default().title("A").image(ImageInfo::new("u", 10, 10)))?;
//! catalog.upsert(ProjectPatch::default().title("B").image(ImageInfo::new("u", 10, 10)).priority(3))?;
//!
//! let ordered = catalog.display_order(&mut rand::thread_rng());
//! assert_eq!(ordered[0].title, "B");
//! # Ok::<(), folio::FolioError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;

pub use app::{handle_request, Catalog, CategoryFilter, Request, Response};
pub use domain::{FolioError, ProjectPatch, ProjectRecord, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default rotation size for the trace export file.
const DEFAULT_TRACE_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default number of rotated trace files kept.
const DEFAULT_TRACE_BACKUPS: usize = 3;

/// Runtime configuration.
///
/// Every field is optional in the TOML file and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding `storage.json` and the trace file.
    ///
    /// Resolved from the environment when unset; see
    /// [`infrastructure::paths::get_data_dir`].
    pub data_dir: Option<PathBuf>,

    /// Storage key the project collection lives under. Default: `"userProjects"`
    pub storage_key: String,

    /// Tracing level or filter directive. Default: `"warn"`
    pub trace_level: Option<String>,

    /// Export spans to a JSON-lines file in the data directory.
    pub trace_export: bool,

    /// Size at which the trace file rotates.
    pub trace_max_bytes: u64,

    /// Rotated trace files to keep.
    pub trace_backups: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: storage::DEFAULT_STORAGE_KEY.to_string(),
            trace_level: None,
            trace_export: false,
            trace_max_bytes: DEFAULT_TRACE_MAX_BYTES,
            trace_backups: DEFAULT_TRACE_BACKUPS,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Config`] for malformed TOML or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| FolioError::Config(format!("invalid config: {e}")))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FolioError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default config file is used
    /// if present, otherwise defaults apply. `FOLIO_*` environment variables are
    /// applied on top.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Config`] if a config file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match infrastructure::get_config_file() {
                Some(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };

        let env: BTreeMap<String, String> = std::env::vars()
            .filter_map(|(k, v)| {
                k.strip_prefix("FOLIO_")
                    .map(|name| (name.to_ascii_lowercase(), v.clone()))
            })
            .collect();
        config.apply_overrides(&env);

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Builds a configuration from `key -> value` pairs over the defaults.
    #[must_use]
    pub fn from_map(values: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        config.apply_overrides(values);
        config
    }

    /// Applies string overrides keyed by field name.
    ///
    /// Unknown keys and unparsable values are ignored, keeping the current value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use folio::Config;
    ///
    /// let mut overrides = BTreeMap::new();
    /// overrides.insert("trace_level".to_string(), "debug".to_string());
    /// overrides.insert("trace_backups".to_string(), "not a number".to_string());
    ///
    /// let mut config = Config::default();
    /// config.apply_overrides(&overrides);
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// assert_eq!(config.trace_backups, 3);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) {
        if let Some(dir) = overrides.get("data_dir").filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(infrastructure::expand_tilde(dir.trim())));
        }
        if let Some(key) = overrides.get("storage_key").filter(|v| !v.trim().is_empty()) {
            self.storage_key = key.trim().to_string();
        }
        if let Some(level) = overrides.get("trace_level").filter(|v| !v.trim().is_empty()) {
            self.trace_level = Some(level.trim().to_string());
        }
        if let Some(export) = overrides.get("trace_export").and_then(|v| parse_bool(v)) {
            self.trace_export = export;
        }
        if let Some(bytes) = overrides.get("trace_max_bytes").and_then(|v| v.trim().parse().ok()) {
            self.trace_max_bytes = bytes;
        }
        if let Some(backups) = overrides.get("trace_backups").and_then(|v| v.trim().parse().ok()) {
            self.trace_backups = backups;
        }
    }

    /// The data directory: configured, or resolved from the environment.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.as_ref().map_or_else(infrastructure::get_data_dir, |dir| {
            PathBuf::from(infrastructure::expand_tilde(&dir.to_string_lossy()))
        })
    }
}

/// Opens the on-disk catalog described by `config`.
///
/// # Errors
///
/// Returns an error if the data directory or storage file cannot be opened.
pub fn open_catalog(config: &Config) -> Result<Catalog<storage::JsonStorage>> {
    let data_dir = config.data_dir();
    tracing::debug!(data_dir = ?data_dir, key = %config.storage_key, "opening catalog");

    let medium = infrastructure::open_storage(&data_dir)?;
    Ok(Catalog::new(storage::ProjectStore::with_key(
        medium,
        config.storage_key.clone(),
    )))
}
