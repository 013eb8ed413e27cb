//! A single log record and its text rendering.

use chrono::NaiveDateTime;
use serde_json::Value;

use super::level::LogLevel;

/// Timestamp format used inside rendered records.
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// One log event.  Rendered immediately by a sink and then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub level: LogLevel,
    pub message: String,
    /// Extra context values appended after the message.
    pub args: Vec<Value>,
}

impl LogRecord {
    pub fn new(timestamp: NaiveDateTime, level: LogLevel, message: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
            args,
        }
    }

    /// `message` followed by every arg, joined with single spaces.
    ///
    /// String args are written verbatim; everything else as compact JSON.
    pub fn body(&self) -> String {
        let mut out = self.message.clone();
        for arg in &self.args {
            out.push(' ');
            match arg {
                Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
        }
        out
    }

    /// The line written to log files: `[timestamp] [LEVEL] body`.
    pub fn to_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format(RECORD_TIMESTAMP_FORMAT),
            self.level.label(),
            self.body()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_milli_opt(12, 0, 5, 42)
            .unwrap()
    }

    #[test]
    fn test_line_without_args() {
        let record = LogRecord::new(at_noon(), LogLevel::Info, "config loaded", vec![]);
        assert_eq!(record.to_line(), "[2026-03-14 12:00:05.042] [INFO] config loaded");
    }

    #[test]
    fn test_string_args_are_appended_verbatim() {
        let record = LogRecord::new(
            at_noon(),
            LogLevel::Warn,
            "retrying",
            vec![json!("attempt"), json!(2)],
        );
        assert_eq!(record.body(), "retrying attempt 2");
    }

    #[test]
    fn test_object_args_render_as_compact_json() {
        let record = LogRecord::new(
            at_noon(),
            LogLevel::Error,
            "failed",
            vec![json!({"code": 1})],
        );
        assert_eq!(record.to_line(), "[2026-03-14 12:00:05.042] [ERROR] failed {\"code\":1}");
    }
}
