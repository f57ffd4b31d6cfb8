//! Application layer: record operations and request handling.
//!
//! This module sits between front ends (the CLI in `main.rs`) and the
//! domain/storage layers.
//!
//! ```text
//! Front end → Request → handle_request → Catalog → ProjectStore → Storage
//!                ↑                                                   │
//!                └──────────────────── Response ←────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: Create, update, delete, reset, search and category filtering
//! - [`handler`]: Serializable requests and responses dispatched to a catalog

pub mod catalog;
pub mod handler;

pub use catalog::{filter_by_category, next_id, Catalog, CategoryFilter};
pub use handler::{handle_request, ListOrder, Request, Response};
