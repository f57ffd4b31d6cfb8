//! Record operations on top of the project store.
//!
//! [`Catalog`] implements create, update, delete and reset over a [`ProjectStore`].
//! Every operation loads the full collection, changes it in memory and writes it
//! back in one piece, so readers never see a partial update.

use crate::domain::error::{FolioError, Result};
use crate::domain::project::{NewProject, ProjectPatch, ProjectRecord};
use crate::domain::validation::validate_patch;
use crate::storage::{default_projects, order_for_display, ProjectStore, Storage};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects which categories a listing shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(&self, record: &ProjectRecord) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => record.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Category(s.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Category(category) => f.write_str(category),
        }
    }
}

/// Keeps the records `filter` selects, preserving their order.
#[must_use]
pub fn filter_by_category(records: Vec<ProjectRecord>, filter: &CategoryFilter) -> Vec<ProjectRecord> {
    records.into_iter().filter(|r| filter.matches(r)).collect()
}

/// Returns the id a new record receives: one past the largest existing id.
#[must_use]
pub fn next_id(records: &[ProjectRecord]) -> u64 {
    records
        .iter()
        .map(|r| r.id)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The project catalog.
///
/// # Examples
///
/// ```
/// use folio::app::Catalog;
/// use folio::domain::{ImageInfo, ProjectPatch};
/// use folio::storage::MemoryStorage;
///
/// let mut catalog = Catalog::with_storage(MemoryStorage::new());
/// let record = catalog.upsert(
///     ProjectPatch::default()
///         .title("A")
///         .image(ImageInfo::new("u", 10, 10)),
/// )?;
/// assert_eq!(record.id, 1);
/// assert!(catalog.remove(1));
/// assert!(!catalog.remove(1));
/// # Ok::<(), folio::FolioError>(())
/// ```
#[derive(Debug)]
pub struct Catalog<S> {
    store: ProjectStore<S>,
    clock: fn() -> i64,
    strict_writes: bool,
}

impl<S: Storage> Catalog<S> {
    pub fn new(store: ProjectStore<S>) -> Self {
        Self {
            store,
            clock: now_millis,
            strict_writes: false,
        }
    }

    /// A catalog over `storage` using the default storage key.
    pub fn with_storage(storage: S) -> Self {
        Self::new(ProjectStore::new(storage))
    }

    /// Replaces the clock used to stamp `created_at` (epoch milliseconds).
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Makes [`Catalog::upsert`] return write failures instead of logging them.
    ///
    /// Off by default: a failed write is logged and the record is still returned.
    #[must_use]
    pub fn with_strict_writes(mut self, strict: bool) -> Self {
        self.strict_writes = strict;
        self
    }

    pub const fn store(&self) -> &ProjectStore<S> {
        &self.store
    }

    /// Loads the collection a write will replace.
    ///
    /// A missing medium yields the default collection, as [`ProjectStore::load`]
    /// does. Any other read failure is returned, so a collection that exists but
    /// cannot be read is never overwritten.
    fn load_for_write(&self) -> Result<Vec<ProjectRecord>> {
        match self.store.try_load() {
            Ok(records) => Ok(records),
            Err(FolioError::StorageUnavailable(reason)) => {
                tracing::debug!(%reason, "storage unavailable, starting from default projects");
                Ok(default_projects())
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored projects are unreadable, refusing to overwrite them");
                Err(e)
            }
        }
    }

    fn persist(&mut self, records: &[ProjectRecord]) -> Result<()> {
        if self.strict_writes {
            self.store.try_save_all(records)
        } else {
            self.store.save_all(records);
            Ok(())
        }
    }

    /// Every record, in stored order.
    pub fn list_all(&self) -> Vec<ProjectRecord> {
        self.store.load()
    }

    /// Looks up one record.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::NotFound`] if no record has `id`.
    pub fn get(&self, id: u64) -> Result<ProjectRecord> {
        self.store
            .load()
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(FolioError::NotFound(id))
    }

    /// Creates a record or merges into an existing one.
    ///
    /// With an `id` matching a stored record, only the fields the patch supplies are
    /// overwritten; `id` and `created_at` never change. Otherwise a new record is
    /// built with the [`NewProject`] defaults, given the next free id and the
    /// current time, and appended. A patch whose `id` matches nothing creates a new
    /// record under a freshly assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Validation`] if the patch carries invalid values, or
    /// if a new record would lack a title or image. Returns the read error if the
    /// stored collection exists but cannot be read, leaving it untouched. With
    /// [`Catalog::with_strict_writes`], a failed write is returned as well.
    pub fn upsert(&mut self, patch: ProjectPatch) -> Result<ProjectRecord> {
        let _span = tracing::debug_span!("catalog_upsert", id = ?patch.id).entered();

        validate_patch(&patch)?;

        let mut records = self.load_for_write()?;

        if let Some(id) = patch.id {
            if let Some(existing) = records.iter_mut().find(|r| r.id == id) {
                patch.apply_to(existing);
                let merged = existing.clone();
                self.persist(&records)?;

                tracing::debug!(id, "project updated");
                return Ok(merged);
            }
            tracing::debug!(id, "no project with requested id, creating a new one");
        }

        let id = next_id(&records);
        let record = NewProject::from_patch(patch)?.into_record(id, (self.clock)());
        records.push(record.clone());
        self.persist(&records)?;

        tracing::debug!(id, title = %record.title, "project created");
        Ok(record)
    }

    /// Deletes the record with `id`.
    ///
    /// Returns `true` only if the record existed and the shortened collection was
    /// written. Failures are logged; see [`Catalog::try_remove`].
    pub fn remove(&mut self, id: u64) -> bool {
        self.try_remove(id).unwrap_or_else(|e| {
            tracing::warn!(id, error = %e, "failed to remove project");
            false
        })
    }

    /// Deletes the record with `id`, surfacing failures.
    ///
    /// Returns `Ok(false)`, leaving storage untouched, when no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored collection cannot be read or the write fails.
    pub fn try_remove(&mut self, id: u64) -> Result<bool> {
        let _span = tracing::debug_span!("catalog_remove", id).entered();

        let mut records = self.load_for_write()?;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            tracing::debug!("project not found");
            return Ok(false);
        }

        self.store.try_save_all(&records)?;
        tracing::debug!("project removed");
        Ok(true)
    }

    /// Replaces the collection with the default (empty) set.
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Like [`Catalog::reset`], surfacing failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable or the removal fails.
    pub fn try_reset(&mut self) -> Result<()> {
        self.store.try_reset()
    }

    /// Every record in display order; see [`order_for_display`].
    pub fn display_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ProjectRecord> {
        order_for_display(self.store.load(), rng)
    }

    /// Records whose title fuzzy-matches `query`, best match first.
    ///
    /// A blank query returns every record in stored order.
    pub fn search(&self, query: &str) -> Vec<ProjectRecord> {
        let query = query.trim();
        let records = self.store.load();
        if query.is_empty() {
            return records;
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, ProjectRecord)> = records
            .into_iter()
            .filter_map(|r| matcher.fuzzy_match(&r.title, query).map(|score| (score, r)))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        tracing::debug!(query, matches = scored.len(), "search complete");
        scored.into_iter().map(|(_, r)| r).collect()
    }
}
