//! Domain layer for folio.
//!
//! This module contains the core types and rules of the catalog, independent of
//! where records are stored or how they are presented.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`project`]: Project record, partial updates and the new-record builder
//! - [`reference`]: Categories, image sizes and priority levels
//! - [`validation`]: Form drafts, image probes and write-boundary checks
//!
//! # Examples
//!
//! ```
//! use folio::domain::{ImageInfo, NewProject, Result};
//!
//! fn first_record() -> Result<u64> {
//!     let record = NewProject::new("Poster", ImageInfo::new("https://x/p.png", 1200, 800))
//!         .into_record(1, 0);
//!     Ok(record.id)
//! }
//! # assert_eq!(first_record().unwrap(), 1);
//! ```

pub mod error;
pub mod project;
pub mod reference;
pub mod validation;

pub use error::{FieldErrors, FolioError, Result};
pub use project::{ImageInfo, NewProject, Orientation, ProjectPatch, ProjectRecord};
pub use reference::{
    find_image_size, is_known_category, priority_label, ImageSize, PriorityLevel, CATEGORIES,
    DEFAULT_CATEGORY, IMAGE_SIZES, MAX_PRIORITY, PRIORITY_LEVELS,
};
pub use validation::{validate_patch, ImageProbe, ProjectDraft, UrlShapeProbe};
