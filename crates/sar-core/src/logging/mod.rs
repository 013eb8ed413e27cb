//! Log levels, records, archive naming, and the [`Logger`] trait.
//!
//! The file/console sink with rotation lives in the `sar-cli` infrastructure
//! layer; this module only defines what a log record *is* and the trait the
//! admin gate writes through.
//!
//! # Why a trait? (for beginners)
//!
//! The admin gate must write audit entries, but it should not care whether
//! they end up in a rotating file, on the console, or in a `Vec` inside a
//! unit test.  [`Logger`] is that seam: production passes the real sink,
//! tests pass a [`MemoryLogger`] and then inspect what was recorded.

pub mod archive;
pub mod level;
pub mod record;

use std::sync::Mutex;

use chrono::Local;
use serde_json::Value;

use crate::admin::AuditRecord;

pub use archive::{archive_file_name, parse_archive_file_name, ArchiveStamp, ARCHIVE_TIMESTAMP_FORMAT};
pub use level::{LogLevel, ParseLogLevelError};
pub use record::{LogRecord, RECORD_TIMESTAMP_FORMAT};

/// Message prefix that marks audit entries.
pub const AUDIT_PREFIX: &str = "[AUDIT]";

/// Destination for leveled log records.
///
/// Implementations must never panic or surface I/O errors: logging is not
/// allowed to abort the operation being logged.
pub trait Logger: Send + Sync {
    /// Emits one record, subject to the implementation's level filter.
    fn log(&self, level: LogLevel, message: &str, args: &[Value]);

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, &[]);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, &[]);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, &[]);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, &[]);
    }

    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message, &[]);
    }

    /// Writes an audit entry at INFO: the [`AUDIT_PREFIX`] message followed
    /// by the record as JSON.
    fn audit(&self, record: &AuditRecord) {
        let message = format!(
            "{AUDIT_PREFIX} {} executed `{}`",
            record.actor, record.command
        );
        let args = match serde_json::to_value(record) {
            Ok(json) => vec![json],
            Err(_) => Vec::new(),
        };
        self.log(LogLevel::Info, &message, &args);
    }
}

/// A [`Logger`] that keeps every record in memory.
///
/// Accepts all levels.  Intended for tests and for capturing output of a
/// nested operation.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Records at exactly `level`.
    pub fn records_at(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records().into_iter().filter(|r| r.level == level).collect()
    }

    /// Audit entries, i.e. records whose message starts with [`AUDIT_PREFIX`].
    pub fn audit_records(&self) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.message.starts_with(AUDIT_PREFIX))
            .collect()
    }

    /// Whether any record's rendered body contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|r| r.body().contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str, args: &[Value]) {
        let record = LogRecord::new(Local::now().naive_local(), level, message, args.to_vec());
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }
}
