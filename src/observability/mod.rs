//! Logging and trace export.
//!
//! Everything in the crate logs through `tracing` macros and spans. This module
//! installs the subscriber that receives them:
//!
//! ```text
//! tracing ─┬─ EnvFilter ─ fmt layer ──────────────────────────────→ stderr
//!          └─ tracing-opentelemetry → SDK → JsonLineExporter ─────→ folio-traces.json
//! ```
//!
//! The export branch is optional (`trace_export` in the config) and writes one JSON
//! object per span to a file that rotates by size.
//!
//! # Configuration
//!
//! Level is resolved from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in the config file, raised by `-v` flags
//! 3. Default: `"warn"`
//!
//! # Modules
//!
//! - `init`: Subscriber setup and level resolution
//! - `export`: OpenTelemetry span exporter
//! - `file_writer`: Rotating file writer

mod export;
mod file_writer;
mod init;

pub use file_writer::RotationPolicy;
pub use init::{filter_directive, init_tracing};
