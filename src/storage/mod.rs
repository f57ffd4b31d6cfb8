//! Storage layer for persistent project data.
//!
//! Records are persisted as one JSON array under a single key of a key-value
//! medium, and ordered for display by explicit priority with a shuffled remainder.
//!
//! # Modules
//!
//! - `backend`: Storage medium trait
//! - `json`: JSON file medium with atomic writes
//! - `memory`: In-memory medium with fault injection
//! - `store`: Whole-collection load/save/reset with safe defaults
//! - `ordering`: Priority sort and Fisher-Yates shuffle for display

pub mod backend;
pub mod json;
pub mod memory;
pub mod ordering;
pub mod store;

pub use backend::Storage;
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use ordering::{order_for_display, order_for_display_with, partition_by_priority, shuffle, sort_by_priority};
pub use store::{default_projects, ProjectStore, DEFAULT_STORAGE_KEY};
