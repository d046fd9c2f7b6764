//! Tracing initialization and subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service and instrumentation scope name reported in every trace.
pub const SERVICE_NAME: &str = "stickerpicker";

const DEFAULT_DIRECTIVE: &str = "info";

/// Resolves the filter directive: plugin option, then `RUST_LOG`, then info.
///
/// # Example
///
/// ```rust
/// use stickerpicker::observability::filter_directive;
///
/// assert_eq!(filter_directive(Some("debug"), Some("warn".into())), "debug");
/// assert_eq!(filter_directive(None, None), "info");
/// ```
#[must_use]
pub fn filter_directive(configured: Option<&str>, env: Option<String>) -> String {
    configured
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .map(str::to_string)
        .or_else(|| env.filter(|level| !level.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Installs the global subscriber exporting spans to the trace file.
///
/// Observability is optional: when the data directory cannot be created the
/// call returns without installing anything. Only the first successful call
/// per thread takes effect, so both the plugin and its worker can call it.
pub fn init_tracing(config: &Config) {
    let directive = filter_directive(config.trace_level.as_deref(), std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let trace_file = crate::infrastructure::trace_file_path();
    if let Some(parent) = trace_file.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = tracer::create_tracer_provider(trace_file, resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry().with(filter).with(otel_layer).try_init();
}
