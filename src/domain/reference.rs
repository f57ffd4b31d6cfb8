//! Fixed reference data: categories, image sizes and priority levels.
//!
//! These are the enumerations the admin form offers. The store itself does not
//! enforce category membership; image sizes are enforced only when a form value is
//! resolved through [`find_image_size`].

use crate::domain::error::{FolioError, Result};
use crate::domain::project::Orientation;
use serde::Serialize;

/// Project categories, in display order.
pub const CATEGORIES: [&str; 6] = [
    "Promotional Graphics",
    "Social Media Announcements",
    "News & Updates Graphics",
    "Website Projects",
    "UX/UI Design",
    "Other Designs",
];

/// Category assigned to new records that do not name one.
pub const DEFAULT_CATEGORY: &str = CATEGORIES[0];

/// Highest priority a record may carry.
pub const MAX_PRIORITY: u8 = 5;

/// A selectable image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
    pub label: &'static str,
    pub orientation: Orientation,
}

impl ImageSize {
    /// The `WxH` key used by forms to reference this size.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

pub const IMAGE_SIZES: [ImageSize; 5] = [
    ImageSize { width: 1200, height: 800, label: "1200x800 (Landscape)", orientation: Orientation::Landscape },
    ImageSize { width: 800, height: 1200, label: "800x1200 (Portrait)", orientation: Orientation::Portrait },
    ImageSize { width: 1200, height: 1200, label: "1200x1200 (Square)", orientation: Orientation::Square },
    ImageSize { width: 1600, height: 900, label: "1600x900 (Widescreen)", orientation: Orientation::Landscape },
    ImageSize { width: 900, height: 1600, label: "900x1600 (Tall Portrait)", orientation: Orientation::Portrait },
];

/// A priority value with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriorityLevel {
    pub value: u8,
    pub label: &'static str,
}

pub const PRIORITY_LEVELS: [PriorityLevel; 6] = [
    PriorityLevel { value: 0, label: "None (random position)" },
    PriorityLevel { value: 1, label: "Low" },
    PriorityLevel { value: 2, label: "Medium" },
    PriorityLevel { value: 3, label: "High" },
    PriorityLevel { value: 4, label: "Very high" },
    PriorityLevel { value: 5, label: "Highest" },
];

/// Returns whether `category` is one of [`CATEGORIES`].
#[must_use]
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

/// Label for a priority value, or `None` outside `0..=MAX_PRIORITY`.
#[must_use]
pub fn priority_label(value: u8) -> Option<&'static str> {
    PRIORITY_LEVELS
        .iter()
        .find(|level| level.value == value)
        .map(|level| level.label)
}

/// Resolves a `WxH` form value against [`IMAGE_SIZES`].
///
/// # Errors
///
/// Returns [`FolioError::InvalidSize`] if the value is malformed or names a size
/// that is not in the list.
///
/// # Examples
///
/// ```
/// use folio::domain::{find_image_size, Orientation};
///
/// let size = find_image_size("800x1200")?;
/// assert_eq!(size.orientation, Orientation::Portrait);
/// assert!(find_image_size("640x480").is_err());
/// # Ok::<(), folio::FolioError>(())
/// ```
pub fn find_image_size(value: &str) -> Result<ImageSize> {
    let invalid = || FolioError::InvalidSize(value.to_string());

    let (width, height) = value.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;

    IMAGE_SIZES
        .iter()
        .find(|size| size.width == width && size.height == height)
        .copied()
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_size_resolves_by_its_key() {
        for size in IMAGE_SIZES {
            assert_eq!(find_image_size(&size.key()).unwrap(), size);
        }
    }

    #[test]
    fn malformed_sizes_are_invalid() {
        for value in ["", "1200", "x800", "1200x", "abcxdef", "1200x801"] {
            assert!(
                matches!(find_image_size(value), Err(FolioError::InvalidSize(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn priority_labels_cover_the_range() {
        for value in 0..=MAX_PRIORITY {
            assert!(priority_label(value).is_some());
        }
        assert!(priority_label(MAX_PRIORITY + 1).is_none());
    }
}
