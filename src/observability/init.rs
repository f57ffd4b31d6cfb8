//! Tracing subscriber setup.

use super::export;
use super::file_writer::RotationPolicy;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name attached to exported spans.
const SERVICE_NAME: &str = "folio";

/// Picks the filter directive.
///
/// `RUST_LOG` wins when set. Otherwise each `-v` raises the level one step from
/// the configured `trace_level` (default `"warn"`).
#[must_use]
pub fn filter_directive(config: &Config, verbosity: u8, rust_log: Option<&str>) -> String {
    if let Some(directive) = rust_log.filter(|d| !d.trim().is_empty()) {
        return directive.to_string();
    }

    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    let base = config.trace_level.as_deref().unwrap_or("warn");

    match LEVELS.iter().position(|l| l.eq_ignore_ascii_case(base)) {
        Some(start) => LEVELS[(start + usize::from(verbosity)).min(LEVELS.len() - 1)].to_string(),
        None => base.to_string(),
    }
}

/// Installs the global tracing subscriber.
///
/// Human-readable events go to stderr. When `config.trace_export` is set, spans are
/// also exported through OpenTelemetry to `folio-traces.json` in the data
/// directory. Calling this more than once is harmless: only the first call
/// installs a subscriber. If the data directory cannot be created, tracing still
/// goes to stderr and export is skipped.
pub fn init_tracing(config: &Config, verbosity: u8) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(config, verbosity, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let otel_layer = if config.trace_export {
        let data_dir = config.data_dir();
        if std::fs::create_dir_all(&data_dir).is_ok() {
            let resource = Resource::new(vec![
                KeyValue::new("service.name", SERVICE_NAME),
                KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            ]);
            let policy = RotationPolicy {
                max_bytes: config.trace_max_bytes,
                max_backups: config.trace_backups,
            };
            let provider = export::create_tracer_provider(
                data_dir.join(crate::infrastructure::paths::TRACE_FILE),
                policy,
                resource,
                SERVICE_NAME,
            );
            Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)))
        } else {
            None
        }
    } else {
        None
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
