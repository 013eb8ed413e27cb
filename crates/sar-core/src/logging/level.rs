//! Log severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a log record, ordered from most to least severe.
///
/// The numeric rank is what filtering compares: a record at level `L` is
/// emitted only when `L.rank() <= threshold.rank()`.
///
/// | Level | Rank |
/// |-------|------|
/// | Error | 0    |
/// | Warn  | 1    |
/// | Info  | 2    |
/// | Debug | 3    |
/// | Trace | 4    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Whether a record at `self` passes a sink configured at `threshold`.
    pub fn is_enabled_at(self, threshold: LogLevel) -> bool {
        self.rank() <= threshold.rank()
    }

    /// Upper-case label used in rendered records, e.g. `"WARN"`.
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level {0:?} (expected error, warn, info, debug or trace)")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    /// Case-insensitive; accepts `warning` as an alias for `warn`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_run_from_error_to_trace() {
        let ranks: Vec<u8> = LogLevel::ALL.iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_info_threshold_admits_error_warn_info_only() {
        let enabled: Vec<LogLevel> = LogLevel::ALL
            .into_iter()
            .filter(|l| l.is_enabled_at(LogLevel::Info))
            .collect();
        assert_eq!(enabled, vec![LogLevel::Error, LogLevel::Warn, LogLevel::Info]);
    }

    #[test]
    fn test_error_threshold_admits_only_errors() {
        assert!(LogLevel::Error.is_enabled_at(LogLevel::Error));
        assert!(!LogLevel::Warn.is_enabled_at(LogLevel::Error));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" Warning ".parse::<LogLevel>(), Ok(LogLevel::Warn));
    }

    #[test]
    fn test_parse_unknown_level_fails() {
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_default_level_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
