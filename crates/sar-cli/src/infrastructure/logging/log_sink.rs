//! Leveled console + file logging with size-based rotation.
//!
//! # Files
//!
//! Two active files live in the log directory:
//!
//! | Category | File        | Receives           |
//! |----------|-------------|--------------------|
//! | General  | `cli.log`   | WARN, INFO, DEBUG, TRACE |
//! | Error    | `error.log` | ERROR only         |
//!
//! # Rotation and retention (for beginners)
//!
//! After every append the sink checks the size of the file it just wrote
//! (one `stat` call).  Once the size **exceeds** the limit (10 MiB by
//! default):
//!
//! 1. The active file is renamed to an archive, e.g.
//!    `cli.log → cli_2026-03-14_12-00-05.log`.
//! 2. A fresh, empty active file is created.
//! 3. Retention runs: archives of that category are listed, sorted newest
//!    first by the embedded timestamp, and all but the newest N (10 by
//!    default) are deleted.
//!
//! Retention only runs on rotation, never on an ordinary write.
//!
//! # Failure policy
//!
//! Logging never panics and never returns an error.  The first file-system
//! error (directory not creatable, disk full, permissions, …) switches file
//! logging off for the rest of the process; console output continues.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{Local, NaiveDateTime, Timelike};
use colored::Colorize;
use sar_core::logging::{
    archive_file_name, parse_archive_file_name, ArchiveStamp, LogLevel, LogRecord, Logger,
};
use serde_json::Value;

/// Size above which an active log file is rotated: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of archives kept per category.
pub const DEFAULT_MAX_ARCHIVES: usize = 10;

/// Time source for record timestamps and archive names.
///
/// Injected so tests can produce distinct, predictable archive names.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// The two active log files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    General,
    Error,
}

impl LogCategory {
    pub const ALL: [LogCategory; 2] = [LogCategory::General, LogCategory::Error];

    /// ERROR records go to the error file, everything else to the general file.
    pub fn for_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LogCategory::Error,
            _ => LogCategory::General,
        }
    }

    fn stem(self) -> &'static str {
        match self {
            LogCategory::General => "cli",
            LogCategory::Error => "error",
        }
    }

    fn extension(self) -> &'static str {
        ".log"
    }

    pub fn file_name(self) -> String {
        format!("{}{}", self.stem(), self.extension())
    }
}

/// Construction-time settings for a [`LogSink`].
#[derive(Debug, Clone)]
pub struct LogSinkConfig {
    pub dir: PathBuf,
    pub level: LogLevel,
    pub max_file_bytes: u64,
    pub max_archives: usize,
    pub silent: bool,
    pub file_logging: bool,
}

impl LogSinkConfig {
    /// Defaults: INFO level, 10 MiB files, 10 archives, both sinks on.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            level: LogLevel::Info,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_archives: DEFAULT_MAX_ARCHIVES,
            silent: false,
            file_logging: true,
        }
    }
}

/// One rotated archive on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub stamp: ArchiveStamp,
}

/// Runtime toggles, changed through `&self` methods.
#[derive(Debug)]
struct SinkState {
    level: LogLevel,
    silent: bool,
    file_logging: bool,
}

/// Dual-sink (console + file) logger with rotation and retention.
///
/// Shared as `Arc<LogSink>` between the admin gate, the `tracing` layer and
/// command handlers; all methods take `&self`.
pub struct LogSink {
    dir: PathBuf,
    max_file_bytes: u64,
    max_archives: usize,
    state: Mutex<SinkState>,
    clock: Box<dyn Clock>,
}

impl LogSink {
    pub fn new(config: LogSinkConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: LogSinkConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            dir: config.dir,
            max_file_bytes: config.max_file_bytes,
            max_archives: config.max_archives,
            state: Mutex::new(SinkState {
                level: config.level,
                silent: config.silent,
                file_logging: config.file_logging,
            }),
            clock,
        }
    }

    /// Poisoning is ignored: the state is three plain flags and stays valid.
    fn lock_state(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_level(&self, level: LogLevel) {
        self.lock_state().level = level;
    }

    pub fn level(&self) -> LogLevel {
        self.lock_state().level
    }

    pub fn set_silent(&self, silent: bool) {
        self.lock_state().silent = silent;
    }

    pub fn is_silent(&self) -> bool {
        self.lock_state().silent
    }

    pub fn set_file_logging(&self, enabled: bool) {
        self.lock_state().file_logging = enabled;
    }

    pub fn file_logging_enabled(&self) -> bool {
        self.lock_state().file_logging
    }

    pub fn log_dir(&self) -> &Path {
        &self.dir
    }

    pub fn active_path(&self, category: LogCategory) -> PathBuf {
        self.dir.join(category.file_name())
    }

    /// Appends `record` to its category's active file, then rotates if the
    /// file has grown past the limit.
    fn append(&self, record: &LogRecord) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let category = LogCategory::for_level(record.level);
        let path = self.active_path(category);

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", record.to_line())?;
        drop(file);

        self.rotate_if_needed(category)?;
        Ok(())
    }

    /// Rotates `category` when its active file exceeds the size limit.
    /// Returns whether a rotation happened.
    fn rotate_if_needed(&self, category: LogCategory) -> io::Result<bool> {
        let size = fs::metadata(self.active_path(category))?.len();
        if size <= self.max_file_bytes {
            return Ok(false);
        }
        self.rotate(category)?;
        Ok(true)
    }

    /// Archives the active file of `category`, starts a fresh one and prunes
    /// old archives.  Returns the archive path.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from renaming, creating or deleting files.
    pub fn rotate(&self, category: LogCategory) -> io::Result<PathBuf> {
        let active = self.active_path(category);
        let now = self.clock.now();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);

        // Rotations within the same second continue the sequence so the new
        // archive sorts after the existing ones.
        let sequence = self
            .archives(category)?
            .iter()
            .filter(|a| a.stamp.timestamp == timestamp)
            .map(|a| a.stamp.sequence + 1)
            .max()
            .unwrap_or(0);
        let stamp = ArchiveStamp { timestamp, sequence };

        let archive = self
            .dir
            .join(archive_file_name(category.stem(), category.extension(), stamp));
        fs::rename(&active, &archive)?;
        File::create(&active)?;

        self.enforce_retention(category)?;
        Ok(archive)
    }

    /// Lists the archives of `category`, newest first.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from reading the directory; a missing directory
    /// yields an empty list.
    pub fn archives(&self, category: LogCategory) -> io::Result<Vec<ArchiveEntry>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut archives = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(stamp) = parse_archive_file_name(name, category.stem(), category.extension()) {
                archives.push(ArchiveEntry {
                    path: entry.path(),
                    stamp,
                });
            }
        }

        archives.sort_by(|a, b| b.stamp.cmp(&a.stamp));
        Ok(archives)
    }

    /// Deletes all but the newest `max_archives` archives of `category`.
    /// Returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from listing or deleting files.
    pub fn enforce_retention(&self, category: LogCategory) -> io::Result<usize> {
        let mut removed = 0;
        for stale in self.archives(category)?.iter().skip(self.max_archives) {
            fs::remove_file(&stale.path)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Removes both active log files.  Archives are kept.
    ///
    /// # Errors
    ///
    /// Returns I/O errors other than "not found".
    pub fn clear_logs(&self) -> io::Result<()> {
        for category in LogCategory::ALL {
            match fs::remove_file(self.active_path(category)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Writes `record` to stdout/stderr with a coloured level prefix.
///
/// Console write errors (closed pipe) are ignored.
fn write_console(record: &LogRecord) {
    let body = record.body();
    let _ = match record.level {
        LogLevel::Error => writeln!(io::stderr().lock(), "{} {}", "[ERROR]".red().bold(), body.red()),
        LogLevel::Warn => writeln!(io::stderr().lock(), "{} {}", "[WARN]".yellow().bold(), body.yellow()),
        LogLevel::Info => writeln!(io::stdout().lock(), "{} {}", "[INFO]".blue().bold(), body),
        LogLevel::Debug => writeln!(io::stdout().lock(), "{} {}", "[DEBUG]".dimmed(), body.dimmed()),
        LogLevel::Trace => writeln!(io::stdout().lock(), "{} {}", "[TRACE]".magenta(), body.dimmed()),
    };
}

impl Logger for LogSink {
    fn log(&self, level: LogLevel, message: &str, args: &[Value]) {
        let mut state = self.lock_state();
        if !level.is_enabled_at(state.level) {
            return;
        }

        let record = LogRecord::new(self.clock.now(), level, message, args.to_vec());

        if !state.silent {
            write_console(&record);
        }
        if state.file_logging && self.append(&record).is_err() {
            state.file_logging = false;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Advances one second on every call.
    struct SteppingClock {
        start: NaiveDateTime,
        ticks: AtomicI64,
    }

    impl SteppingClock {
        fn boxed() -> Box<dyn Clock> {
            Box::new(Self {
                start: NaiveDate::from_ymd_opt(2026, 3, 14)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
                ticks: AtomicI64::new(0),
            })
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> NaiveDateTime {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            self.start + Duration::seconds(tick)
        }
    }

    /// Always returns the same instant.
    struct FrozenClock(NaiveDateTime);

    impl Clock for FrozenClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn quiet_config(dir: &Path) -> LogSinkConfig {
        LogSinkConfig {
            silent: true,
            ..LogSinkConfig::new(dir)
        }
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }

    // ── Level filtering and routing ───────────────────────────────────────────

    #[test]
    fn test_records_above_threshold_are_dropped() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(quiet_config(dir.path()));
        sink.set_level(LogLevel::Warn);

        // Act
        sink.info("should not appear");
        sink.warn("should appear");

        // Assert
        let general = read(&sink.active_path(LogCategory::General));
        assert!(!general.contains("should not appear"));
        assert!(general.contains("[WARN] should appear"));
    }

    #[test]
    fn test_errors_go_to_error_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(quiet_config(dir.path()));

        sink.error("disk failure");
        sink.info("routine");

        let errors = read(&sink.active_path(LogCategory::Error));
        let general = read(&sink.active_path(LogCategory::General));
        assert!(errors.contains("[ERROR] disk failure"));
        assert!(!errors.contains("routine"));
        assert!(!general.contains("disk failure"));
    }

    #[test]
    fn test_file_line_includes_timestamp_level_message_and_args() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let at = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let sink = LogSink::with_clock(quiet_config(dir.path()), Box::new(FrozenClock(at)));

        // Act
        sink.log(
            LogLevel::Info,
            "deployed",
            &[Value::from("v1.2"), serde_json::json!({"replicas": 3})],
        );

        // Assert
        assert_eq!(
            read(&sink.active_path(LogCategory::General)),
            "[2026-01-02 03:04:05.000] [INFO] deployed v1.2 {\"replicas\":3}\n"
        );
    }

    #[test]
    fn test_disabled_file_logging_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(quiet_config(dir.path()));
        sink.set_file_logging(false);

        sink.error("not persisted");

        assert!(!sink.active_path(LogCategory::Error).exists());
    }

    #[test]
    fn test_file_error_disables_file_logging_without_panicking() {
        // Arrange: the log "directory" is a regular file, so create_dir_all fails
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "not a directory").unwrap();
        let sink = LogSink::new(quiet_config(&blocker));
        assert!(sink.file_logging_enabled());

        // Act
        sink.info("first");
        sink.info("second");

        // Assert
        assert!(!sink.file_logging_enabled());
    }

    // ── Rotation ──────────────────────────────────────────────────────────────

    #[test]
    fn test_exceeding_threshold_rotates_exactly_once() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let config = LogSinkConfig {
            max_file_bytes: 200,
            ..quiet_config(dir.path())
        };
        let sink = LogSink::with_clock(config, SteppingClock::boxed());
        let active = sink.active_path(LogCategory::General);

        // Act: append until the first rotation happens
        let mut writes = 0;
        while sink.archives(LogCategory::General).unwrap().is_empty() {
            sink.info("a record of moderate length for rotation");
            writes += 1;
            assert!(writes < 100, "rotation never triggered");
        }

        // Assert
        assert_eq!(sink.archives(LogCategory::General).unwrap().len(), 1);
        assert_eq!(fs::metadata(&active).unwrap().len(), 0, "fresh active file must be empty");
        let archived = &sink.archives(LogCategory::General).unwrap()[0];
        assert!(fs::metadata(&archived.path).unwrap().len() > 200);
    }

    #[test]
    fn test_file_at_threshold_is_not_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(quiet_config(dir.path()));
        let active = sink.active_path(LogCategory::General);
        sink.info("seed");
        let size = fs::metadata(&active).unwrap().len();

        let exact = LogSink::new(LogSinkConfig {
            max_file_bytes: size,
            ..quiet_config(dir.path())
        });

        assert!(!exact.rotate_if_needed(LogCategory::General).unwrap());
    }

    #[test]
    fn test_archive_name_uses_prefix_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let at = NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_milli_opt(12, 0, 5, 750)
            .unwrap();
        let sink = LogSink::with_clock(quiet_config(dir.path()), Box::new(FrozenClock(at)));
        sink.error("x");

        let archive = sink.rotate(LogCategory::Error).unwrap();

        assert_eq!(
            archive.file_name().unwrap().to_str().unwrap(),
            "error_2026-03-14_12-00-05.log"
        );
    }

    #[test]
    fn test_rotations_within_same_second_do_not_overwrite() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let at = NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, 5)
            .unwrap();
        let sink = LogSink::with_clock(quiet_config(dir.path()), Box::new(FrozenClock(at)));

        // Act
        let mut created = Vec::new();
        for i in 0..3 {
            sink.info(&format!("generation {i}"));
            created.push(sink.rotate(LogCategory::General).unwrap());
        }

        // Assert
        let archives = sink.archives(LogCategory::General).unwrap();
        assert_eq!(archives.len(), 3);
        assert_eq!(archives[0].path, created[2], "last rotation sorts newest");
        assert!(read(&created[0]).contains("generation 0"));
        assert!(read(&created[2]).contains("generation 2"));
    }

    // ── Retention ─────────────────────────────────────────────────────────────

    #[test]
    fn test_retention_keeps_newest_archives() {
        // Arrange: every record rotates (limit 1 byte); keep 3 archives
        let dir = tempfile::tempdir().unwrap();
        let config = LogSinkConfig {
            max_file_bytes: 1,
            max_archives: 3,
            ..quiet_config(dir.path())
        };
        let sink = LogSink::with_clock(config, SteppingClock::boxed());

        // Act: 3 + 2 rotations
        let mut created = Vec::new();
        for i in 0..5 {
            sink.info(&format!("record {i}"));
            created.push(sink.archives(LogCategory::General).unwrap()[0].path.clone());
        }

        // Assert
        let remaining: Vec<PathBuf> = sink
            .archives(LogCategory::General)
            .unwrap()
            .into_iter()
            .map(|a| a.path)
            .collect();
        let newest_three: Vec<PathBuf> = created.iter().rev().take(3).cloned().collect();
        assert_eq!(remaining, newest_three);
        assert!(!created[0].exists());
        assert!(!created[1].exists());
    }

    #[test]
    fn test_retention_ignores_other_category_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();
        let config = LogSinkConfig {
            max_file_bytes: 1,
            max_archives: 1,
            ..quiet_config(dir.path())
        };
        let sink = LogSink::with_clock(config, SteppingClock::boxed());

        sink.error("e1");
        sink.info("g1");
        sink.info("g2");

        assert_eq!(sink.archives(LogCategory::Error).unwrap().len(), 1);
        assert_eq!(sink.archives(LogCategory::General).unwrap().len(), 1);
        assert!(dir.path().join("notes.txt").exists());
    }

    // ── clear_logs ────────────────────────────────────────────────────────────

    #[test]
    fn test_clear_logs_removes_active_files_but_keeps_archives() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::with_clock(quiet_config(dir.path()), SteppingClock::boxed());
        sink.info("general");
        sink.error("error");
        sink.rotate(LogCategory::General).unwrap();
        sink.info("after rotation");

        // Act
        sink.clear_logs().unwrap();

        // Assert
        assert!(!sink.active_path(LogCategory::General).exists());
        assert!(!sink.active_path(LogCategory::Error).exists());
        assert_eq!(sink.archives(LogCategory::General).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_logs_on_empty_directory_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(quiet_config(&dir.path().join("never-created")));
        assert!(sink.clear_logs().is_ok());
    }

    #[test]
    fn test_archives_of_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(quiet_config(&dir.path().join("absent")));
        assert!(sink.archives(LogCategory::General).unwrap().is_empty());
    }
}
