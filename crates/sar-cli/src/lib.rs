//! sar-cli library crate.
//!
//! The runtime substrate every SAR-CLI subcommand depends on: a YAML config
//! store, a rotating console/file logger, and an admin gate that wraps
//! privileged commands with permission checks, confirmation and audit.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! main.rs  (clap parsing, subscriber setup, exit code)
//!    │
//! [sar-cli]
//!   ├── cli               Subcommand definitions and dispatch
//!   ├── application/      AdminGate use case (traits only, no I/O)
//!   └── infrastructure/
//!         ├── storage/       config.yaml ↔ ConfigTree
//!         ├── logging/       LogSink + tracing layer
//!         ├── confirmation/  dialoguer prompt, scripted test double
//!         ├── environment    SARU_ADMIN, USER, EDITOR, SAR_CLI_HOME, …
//!         └── context        AppContext built once per run
//!    │
//! [sar-core]  ConfigTree, LogRecord, AuthorizationContext, CommandOutcome, …
//! ```
//!
//! # Layer rules
//!
//! - `application` depends on `sar-core` only.
//! - `infrastructure` depends on all other layers plus the OS-facing crates.

/// Application layer: the admin gate.
pub mod application;

/// Command-line surface and dispatch.
pub mod cli;

/// Infrastructure layer: files, terminal, environment.
pub mod infrastructure;
