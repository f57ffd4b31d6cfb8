//! Form drafts and write-boundary validation.
//!
//! A [`ProjectDraft`] carries raw form values exactly as a front end collected them.
//! [`ProjectDraft::validate`] turns a draft into a [`ProjectPatch`], reporting every
//! failing field at once. [`validate_patch`] is the narrower check the catalog runs
//! on every write, whatever produced the patch.

use crate::domain::error::{FieldErrors, FolioError, Result};
use crate::domain::project::{ImageInfo, ProjectPatch};
use crate::domain::reference::{find_image_size, MAX_PRIORITY};
use serde::{Deserialize, Serialize};

/// Checks whether an image URL can be shown.
///
/// The browser front end loaded the image and reported success or failure; here the
/// check is pluggable so callers can supply a real fetch or a fake.
pub trait ImageProbe {
    fn probe(&self, src: &str) -> bool;
}

impl<F> ImageProbe for F
where
    F: Fn(&str) -> bool,
{
    fn probe(&self, src: &str) -> bool {
        self(src)
    }
}

/// Accepts URLs that look loadable without fetching them.
///
/// Allowed: `http://` or `https://` with a non-empty host, `data:image/...`, and
/// absolute paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlShapeProbe;

impl ImageProbe for UrlShapeProbe {
    fn probe(&self, src: &str) -> bool {
        let src = src.trim();
        if src.chars().any(char::is_whitespace) {
            return false;
        }

        if let Some(rest) = src
            .strip_prefix("https://")
            .or_else(|| src.strip_prefix("http://"))
        {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            return !host.is_empty();
        }

        src.starts_with("data:image/") || (src.starts_with('/') && src.len() > 1)
    }
}

/// Raw form values for creating or editing a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    /// Set when editing an existing project.
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    /// Selected size as `WxH`.
    #[serde(default)]
    pub image_size: String,
    #[serde(default)]
    pub priority: String,
}

impl ProjectDraft {
    /// Validates the draft and converts it into a full patch.
    ///
    /// All fields are checked before returning, so the error lists every problem.
    /// An unknown image size is reported as [`FolioError::InvalidSize`] once the
    /// other fields are valid. The image alt text defaults to the title and the
    /// orientation comes from the selected size.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Validation`] for missing or malformed fields and
    /// [`FolioError::InvalidSize`] for a size that is not in the list.
    pub fn validate(&self, probe: &dyn ImageProbe) -> Result<ProjectPatch> {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert("title", "title is required");
        }
        if self.description.trim().is_empty() {
            errors.insert("description", "description is required");
        }
        if self.category.trim().is_empty() {
            errors.insert("category", "category is required");
        }
        if self.image_url.trim().is_empty() {
            errors.insert("image_url", "image URL is required");
        } else if !probe.probe(self.image_url.trim()) {
            errors.insert("image_url", "image URL is invalid or unreachable");
        }
        if self.image_size.trim().is_empty() {
            errors.insert("image_size", "image size is required");
        }

        let priority = if self.priority.trim().is_empty() {
            Some(0)
        } else {
            match self.priority.trim().parse::<u8>() {
                Ok(p) if p <= MAX_PRIORITY => Some(p),
                _ => {
                    errors.insert("priority", format!("priority must be a number from 0 to {MAX_PRIORITY}"));
                    None
                }
            }
        };

        errors.into_result()?;

        let size = find_image_size(&self.image_size)?;
        let title = self.title.trim().to_string();
        let image = ImageInfo::new(self.image_url.trim(), size.width, size.height).with_alt(title.clone());

        Ok(ProjectPatch {
            id: self.id,
            title: Some(title),
            description: Some(self.description.trim().to_string()),
            category: Some(self.category.trim().to_string()),
            image: Some(image),
            orientation: Some(size.orientation),
            priority,
        })
    }
}

/// Checks the fields a patch supplies.
///
/// Priority must be within `0..=MAX_PRIORITY`, a supplied title must not be blank,
/// and image dimensions must be positive. Category is not checked against the
/// known list.
///
/// # Errors
///
/// Returns [`FolioError::Validation`] listing each failing field.
pub fn validate_patch(patch: &ProjectPatch) -> Result<()> {
    let mut errors = FieldErrors::new();

    if let Some(priority) = patch.priority {
        if priority > MAX_PRIORITY {
            errors.insert("priority", format!("priority {priority} is outside 0..={MAX_PRIORITY}"));
        }
    }
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            errors.insert("title", "title must not be blank");
        }
    }
    if let Some(image) = &patch.image {
        if image.width == 0 || image.height == 0 {
            errors.insert("image", "image width and height must be greater than zero");
        }
        if image.src.trim().is_empty() {
            errors.insert("image_url", "image URL must not be blank");
        }
    }

    errors.into_result()
}

/// Convenience for callers holding a validation error.
#[must_use]
pub fn field_errors(err: &FolioError) -> Option<&FieldErrors> {
    match err {
        FolioError::Validation(errors) => Some(errors),
        _ => None,
    }
}
