//! Console + file logging.
//!
//! - [`log_sink`] – the [`LogSink`]: level filter, coloured console output,
//!   `cli.log` / `error.log` files with size-based rotation and retention.
//! - [`tracing_layer`] – routes `tracing` macro events into the same sink.

pub mod log_sink;
pub mod tracing_layer;

pub use log_sink::{
    ArchiveEntry, Clock, LogCategory, LogSink, LogSinkConfig, SystemClock, DEFAULT_MAX_ARCHIVES,
    DEFAULT_MAX_FILE_BYTES,
};
pub use tracing_layer::LogSinkLayer;
