//! Project record model and the new-record builder.
//!
//! [`ProjectRecord`] is both the domain entity and its persisted shape: the store
//! serializes the whole collection as a JSON array of records with camelCase field
//! names. Fields added after the first release carry serde defaults so older
//! payloads keep loading.
//!
//! Writes go through [`ProjectPatch`]. A patch either merges into an existing record
//! ([`ProjectPatch::apply_to`]) or, when no record matches, becomes a fresh record via
//! [`NewProject`], which owns every default a new record receives.

use crate::domain::error::{FieldErrors, FolioError, Result};
use crate::domain::reference::{DEFAULT_CATEGORY, MAX_PRIORITY};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of milliseconds in one minute.
const MILLIS_PER_MINUTE: i64 = 60_000;

/// Number of milliseconds in one hour.
const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Number of milliseconds in one day.
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Image orientation, informational only.
///
/// Not derived from or checked against the image dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Square => "square",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            "square" => Ok(Self::Square),
            other => {
                let mut errors = FieldErrors::new();
                errors.insert(
                    "orientation",
                    format!("unknown orientation '{other}', expected landscape, portrait or square"),
                );
                Err(FolioError::Validation(errors))
            }
        }
    }
}

/// Image shown for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Image URL.
    pub src: String,

    /// Alternative text, omitted from the payload when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    #[must_use]
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            src: src.into(),
            alt: None,
            width,
            height,
        }
    }

    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Reads a stored priority, clamping any integer into `0..=MAX_PRIORITY`.
fn stored_priority<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    let clamped = raw.clamp(0, i64::from(MAX_PRIORITY));
    if clamped != raw {
        tracing::warn!(raw, clamped, "stored priority out of range");
    }
    Ok(u8::try_from(clamped).unwrap_or_default())
}

/// Reads a stored orientation, falling back to the default for unknown names.
fn stored_orientation<'de, D>(deserializer: D) -> std::result::Result<Orientation, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|_| {
        tracing::warn!(%raw, "unknown stored orientation, using default");
        Orientation::default()
    }))
}

/// One portfolio entry.
///
/// `id` is assigned by the catalog on creation and never changes afterwards, and
/// `created_at` (epoch milliseconds) is stamped once at the same moment.
///
/// # Examples
///
/// ```
/// use folio::domain::{ImageInfo, Orientation, ProjectRecord};
///
/// let json = r#"{"id":3,"title":"Poster","image":{"src":"https://x/p.png","width":1200,"height":800}}"#;
/// let record: ProjectRecord = serde_json::from_str(json)?;
/// assert_eq!(record.orientation, Orientation::Landscape);
/// assert_eq!(record.priority, 0);
/// assert_eq!(record.category, "Promotional Graphics");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub image: ImageInfo,
    #[serde(default, deserialize_with = "stored_orientation")]
    pub orientation: Orientation,
    /// `0` means no explicit priority; `1..=5` rank the record, higher first.
    #[serde(default, deserialize_with = "stored_priority")]
    pub priority: u8,
    #[serde(default)]
    pub created_at: i64,
}

impl ProjectRecord {
    /// Whether the record carries an explicit display priority.
    #[must_use]
    pub const fn is_prioritized(&self) -> bool {
        self.priority > 0
    }

    /// Returns a short label describing how long ago the record was added.
    ///
    /// Uses the current wall clock; see [`ProjectRecord::added_ago_at`].
    #[must_use]
    pub fn added_ago(&self) -> String {
        self.added_ago_at(chrono::Utc::now().timestamp_millis())
    }

    /// Returns how long before `now_ms` the record was added.
    ///
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago"
    /// - Less than 1 day: "Xh ago"
    /// - Otherwise: "Xd ago"
    ///
    /// # Examples
    ///
    /// ```
    /// use folio::domain::{ImageInfo, NewProject};
    ///
    /// let record = NewProject::new("A", ImageInfo::new("https://x/a.png", 10, 10))
    ///     .into_record(1, 1_000_000);
    /// assert_eq!(record.added_ago_at(1_000_000 + 5 * 60_000), "5m ago");
    /// ```
    #[must_use]
    pub fn added_ago_at(&self, now_ms: i64) -> String {
        let diff = now_ms - self.created_at;

        if diff < MILLIS_PER_MINUTE {
            "just now".to_string()
        } else if diff < MILLIS_PER_HOUR {
            let mins = diff / MILLIS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < MILLIS_PER_DAY {
            let hours = diff / MILLIS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / MILLIS_PER_DAY;
            format!("{days}d ago")
        }
    }
}

/// A partial record used for both creation and in-place updates.
///
/// Fields left as `None` are not touched on update and fall back to the
/// [`NewProject`] defaults on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

impl ProjectPatch {
    /// A patch targeting the record with `id`.
    #[must_use]
    pub fn for_id(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: ImageInfo) -> Self {
        self.image = Some(image);
        self
    }

    #[must_use]
    pub const fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Merges the supplied fields into `record`.
    ///
    /// `id` and `created_at` are never touched, even if the patch carries an id.
    pub fn apply_to(&self, record: &mut ProjectRecord) {
        if let Some(title) = &self.title {
            record.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            record.description.clone_from(description);
        }
        if let Some(category) = &self.category {
            record.category.clone_from(category);
        }
        if let Some(image) = &self.image {
            record.image = image.clone();
        }
        if let Some(orientation) = self.orientation {
            record.orientation = orientation;
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
        }
    }
}

/// Builder for a record that does not exist yet.
///
/// Holds the named defaults for new records: empty description, the first
/// category, landscape orientation and no priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub image: ImageInfo,
    pub description: String,
    pub category: String,
    pub orientation: Orientation,
    pub priority: u8,
}

impl NewProject {
    pub const DEFAULT_DESCRIPTION: &'static str = "";
    pub const DEFAULT_ORIENTATION: Orientation = Orientation::Landscape;
    pub const DEFAULT_PRIORITY: u8 = 0;

    #[must_use]
    pub fn new(title: impl Into<String>, image: ImageInfo) -> Self {
        Self {
            title: title.into(),
            image,
            description: Self::DEFAULT_DESCRIPTION.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            orientation: Self::DEFAULT_ORIENTATION,
            priority: Self::DEFAULT_PRIORITY,
        }
    }

    /// Builds a new record from a patch, filling every omitted field with its default.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Validation`] if `title` or `image` is missing.
    pub fn from_patch(patch: ProjectPatch) -> Result<Self> {
        let mut errors = FieldErrors::new();
        if patch.title.is_none() {
            errors.insert("title", "a new project needs a title");
        }
        if patch.image.is_none() {
            errors.insert("image", "a new project needs an image");
        }

        match (patch.title, patch.image) {
            (Some(title), Some(image)) => {
                let mut project = Self::new(title, image);
                if let Some(description) = patch.description {
                    project.description = description;
                }
                if let Some(category) = patch.category {
                    project.category = category;
                }
                if let Some(orientation) = patch.orientation {
                    project.orientation = orientation;
                }
                if let Some(priority) = patch.priority {
                    project.priority = priority;
                }
                Ok(project)
            }
            _ => Err(FolioError::Validation(errors)),
        }
    }

    /// Finalizes the builder with the identity assigned by the catalog.
    #[must_use]
    pub fn into_record(self, id: u64, created_at: i64) -> ProjectRecord {
        ProjectRecord {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            image: self.image,
            orientation: self.orientation,
            priority: self.priority,
            created_at,
        }
    }
}
