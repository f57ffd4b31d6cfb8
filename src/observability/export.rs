//! OpenTelemetry span exporter writing JSON lines to a rotating file.
//!
//! Each finished span becomes one compact JSON object on its own line, which keeps
//! the file greppable and easy to load with `jq`. The exporter is wired into a
//! tracer provider with the simple (unbatched) processor, since the CLI is
//! short-lived and must not lose spans on exit.

use super::file_writer::{FileWriter, RotationPolicy};
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

struct JsonLineExporter {
    writer: FileWriter,
    service: String,
    shut_down: bool,
}

impl JsonLineExporter {
    fn new(file_path: PathBuf, policy: RotationPolicy, service: String) -> Self {
        Self {
            writer: FileWriter::new(file_path, policy),
            service,
            shut_down: false,
        }
    }
}

impl SpanExporter for JsonLineExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.shut_down {
            return Box::pin(std::future::ready(Err(TraceError::from("exporter is shut down"))));
        }

        let result = batch
            .iter()
            .map(|span| span_to_json(span, &self.service).to_string())
            .try_for_each(|line| self.writer.write_line(&line))
            .map_err(|e| TraceError::from(e.to_string()));

        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }
}

impl std::fmt::Debug for JsonLineExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLineExporter")
            .field("writer", &self.writer)
            .field("service", &self.service)
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

fn unix_micros(time: SystemTime) -> u128 {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_micros()
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.to_string()),
        Value::Array(_) => json!(format!("{value:?}")),
    }
}

fn attributes(pairs: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = pairs
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn status(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description.to_string() }),
    }
}

/// Renders one span as a flat JSON object.
fn span_to_json(span: &SpanData, service: &str) -> JsonValue {
    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "name": event.name,
                "timeMicros": unix_micros(event.timestamp).to_string(),
                "attributes": attributes(&event.attributes),
            })
        })
        .collect();

    let duration = span
        .end_time
        .duration_since(span.start_time)
        .unwrap_or(Duration::ZERO);

    json!({
        "service": service,
        "name": span.name,
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": if span.parent_span_id == SpanId::INVALID {
            JsonValue::Null
        } else {
            json!(format!("{:016x}", span.parent_span_id))
        },
        "startMicros": unix_micros(span.start_time).to_string(),
        "durationMicros": duration.as_micros().to_string(),
        "attributes": attributes(&span.attributes),
        "events": events,
        "status": status(&span.status),
    })
}

/// Builds a tracer provider exporting every finished span to `file_path`.
pub fn create_tracer_provider(
    file_path: PathBuf,
    policy: RotationPolicy,
    resource: Resource,
    service: &str,
) -> TracerProvider {
    let exporter = JsonLineExporter::new(file_path, policy, service.to_string());

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
