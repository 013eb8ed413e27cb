//! Bridges `tracing` events into the [`LogSink`].
//!
//! Library code (config store, dispatch) logs with the ordinary `tracing`
//! macros.  Installing [`LogSinkLayer`] on the global subscriber makes those
//! events land in the same console + rotating-file output as everything
//! written through the [`Logger`] trait.
//!
//! Event fields other than `message` are appended as `key=value` arguments:
//!
//! ```text
//! warn!(path = %p.display(), "config unreadable")
//!   → [2026-03-14 12:00:05.123] [WARN] config unreadable path=/home/u/.sar-cli/config.yaml
//! ```

use std::fmt;
use std::sync::Arc;

use sar_core::logging::{LogLevel, Logger};
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::log_sink::LogSink;

/// `tracing_subscriber` layer that forwards every event to a [`LogSink`].
///
/// Level filtering is left to the sink so that `--verbose` and the config
/// level apply uniformly.
#[derive(Clone)]
pub struct LogSinkLayer {
    sink: Arc<LogSink>,
}

impl LogSinkLayer {
    pub fn new(sink: Arc<LogSink>) -> Self {
        Self { sink }
    }
}

fn level_of(level: &Level) -> LogLevel {
    match *level {
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        Level::INFO => LogLevel::Info,
        Level::DEBUG => LogLevel::Debug,
        Level::TRACE => LogLevel::Trace,
    }
}

impl<S: Subscriber> Layer<S> for LogSinkLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let args: Vec<Value> = fields
            .extra
            .into_iter()
            .map(|(name, value)| Value::String(format!("{name}={value}")))
            .collect();
        self.sink.log(
            level_of(event.metadata().level()),
            &fields.message.unwrap_or_default(),
            &args,
        );
    }
}

/// Splits an event into its `message` and the remaining named fields.
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    extra: Vec<(&'static str, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, rendered: String) {
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.extra.push((field.name(), rendered));
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}
