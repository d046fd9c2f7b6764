//! OpenTelemetry-based observability with file-based trace export.
//!
//! Spans from the `tracing` macros are bridged into OpenTelemetry and written
//! as OTLP JSON lines to a rotating file in the data directory, so traces can
//! be inspected offline even though the plugin runs sandboxed.
//!
//! ```text
//! tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! # Configuration
//!
//! The filter directive is taken from, in order:
//! 1. the `trace_level` plugin option
//! 2. the `RUST_LOG` environment variable
//! 3. `"info"`
//!
//! # Usage
//!
//! ```rust
//! use stickerpicker::observability::init_tracing;
//! use stickerpicker::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("plugin initialized");
//! ```
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `tracer`: tracer provider with the file exporter
//! - `span_formatter`: OTLP JSON serialization
//! - `file_writer`: size-based rotating writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::{FileWriter, RotationPolicy};
pub use init::{filter_directive, init_tracing, SERVICE_NAME};
