//! # sar-core
//!
//! Shared library for SAR-CLI containing the configuration tree, log record
//! types, and admin authorization values.
//!
//! This crate has zero dependencies on OS APIs: no file system access, no
//! environment reads, no terminal I/O.  Those live in the `sar-cli`
//! infrastructure layer, which builds on the types defined here.
//!
//! # Architecture overview (for beginners)
//!
//! SAR-CLI is a command-line agent.  Every subcommand relies on the same
//! runtime substrate:
//!
//! - **`config`** – A hierarchical key-value tree addressed with dot-paths
//!   such as `"server.port"`, plus the built-in defaults written on first run.
//!
//! - **`logging`** – Log levels, the record format written to log files, the
//!   naming scheme for rotated archives, and the [`Logger`] trait.
//!
//! - **`admin`** – The values computed by the admin gate: who is authorized,
//!   whether the user confirmed, what gets audited, and how an invocation
//!   ended ([`CommandOutcome`]).

pub mod admin;
pub mod config;
pub mod logging;

pub use admin::{
    AccessDecision, AdminDecision, AuditRecord, AuthorizationContext, CommandOutcome, DenialReason,
};
pub use config::{ConfigPathError, ConfigTree, ConfigValue, DotPath};
pub use logging::{LogLevel, LogRecord, Logger, MemoryLogger};
