//! Request dispatch against a catalog.
//!
//! Front ends describe what they want as a [`Request`] and get back a [`Response`].
//! Both are serde types, so a request can come from a CLI flag set, a JSON file, or
//! another process. Errors never escape [`handle_request`]: they are logged and
//! returned as [`Response::Error`] or [`Response::NotFound`].
//!
//! # Example
//!
//! ```rust
//! use folio::app::{handle_request, Catalog, Request, Response};
//! use folio::storage::MemoryStorage;
//!
//! let mut catalog = Catalog::with_storage(MemoryStorage::new());
//! let response = handle_request(&mut catalog, Request::Delete { id: 999 });
//! assert_eq!(response, Response::NotFound { id: 999 });
//! ```

use crate::app::catalog::{filter_by_category, Catalog, CategoryFilter};
use crate::domain::error::{FolioError, Result};
use crate::domain::project::{ProjectPatch, ProjectRecord};
use crate::storage::{order_for_display, Storage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// How a listing is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrder {
    /// Priority first, the rest shuffled.
    #[default]
    Display,
    /// Order of the stored collection.
    Stored,
}

/// Operations a front end can ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// List projects, optionally restricted to one category.
    List {
        #[serde(default)]
        category: CategoryFilter,
        #[serde(default)]
        order: ListOrder,
        /// Seed for the shuffle; a fresh random order when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },

    /// Fetch one project.
    Show { id: u64 },

    /// Create or update a project.
    Save { patch: ProjectPatch },

    /// Delete a project.
    Delete { id: u64 },

    /// Restore the default (empty) collection.
    Reset,

    /// Fuzzy-search project titles.
    Search { query: String },
}

/// Results of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// A list of projects, in the order requested.
    Projects { projects: Vec<ProjectRecord> },

    /// A single project.
    Project { project: ProjectRecord },

    /// A project was stored.
    Saved {
        project: ProjectRecord,
        /// `true` if the project was newly created, `false` if it was updated.
        created: bool,
    },

    /// A project was deleted.
    Deleted { id: u64 },

    /// No project has the requested id.
    NotFound { id: u64 },

    /// The collection was reset.
    Reset,

    /// The request failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

impl Response {
    /// Whether the response reports a failure of any kind.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Error { .. })
    }
}

/// Converts an operation result into a response with consistent logging.
fn respond<T, F>(operation: &str, result: Result<T>, on_success: F) -> Response
where
    F: FnOnce(T) -> Response,
{
    match result {
        Ok(value) => {
            tracing::debug!(operation, "request handled");
            on_success(value)
        }
        Err(FolioError::NotFound(id)) => {
            tracing::debug!(operation, id, "project not found");
            Response::NotFound { id }
        }
        Err(e) => {
            tracing::warn!(operation, error = %e, "request failed");
            Response::Error {
                message: format!("{operation}: {e}"),
            }
        }
    }
}

fn handle_list<S: Storage>(
    catalog: &Catalog<S>,
    category: &CategoryFilter,
    order: ListOrder,
    seed: Option<u64>,
) -> Response {
    let records = filter_by_category(catalog.list_all(), category);

    let projects = match (order, seed) {
        (ListOrder::Stored, _) => records,
        (ListOrder::Display, Some(seed)) => order_for_display(records, &mut StdRng::seed_from_u64(seed)),
        (ListOrder::Display, None) => order_for_display(records, &mut rand::thread_rng()),
    };

    tracing::debug!(%category, count = projects.len(), "projects listed");
    Response::Projects { projects }
}

fn handle_save<S: Storage>(catalog: &mut Catalog<S>, patch: ProjectPatch) -> Response {
    let updating = patch
        .id
        .is_some_and(|id| catalog.list_all().iter().any(|r| r.id == id));

    respond("save project", catalog.upsert(patch), |project| Response::Saved {
        project,
        created: !updating,
    })
}

/// Processes a request against `catalog`.
pub fn handle_request<S: Storage>(catalog: &mut Catalog<S>, request: Request) -> Response {
    let span = tracing::debug_span!("handle_request", request = ?request);
    let _guard = span.entered();

    match request {
        Request::List { category, order, seed } => handle_list(catalog, &category, order, seed),

        Request::Show { id } => respond("show project", catalog.get(id), |project| Response::Project { project }),

        Request::Save { patch } => handle_save(catalog, patch),

        Request::Delete { id } => respond("delete project", catalog.try_remove(id), |removed| {
            if removed {
                Response::Deleted { id }
            } else {
                Response::NotFound { id }
            }
        }),

        Request::Reset => respond("reset projects", catalog.try_reset(), |()| Response::Reset),

        Request::Search { query } => Response::Projects {
            projects: catalog.search(&query),
        },
    }
}
