//! Application layer use cases for SAR-CLI.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! types in `sar_core` and the infrastructure (files, terminal, environment).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain values to fulfil a user goal (e.g., "run this
//!   privileged command only if the user is an admin and said yes").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the infrastructure can be swapped without changing this code.
//! - **Contain no OS calls, no terminal I/O, no file system access**.
//!
//! # Sub-modules
//!
//! - **`admin_gate`** – Wraps privileged commands with the admin check, the
//!   optional confirmation prompt, the audit record and error reporting.

pub mod admin_gate;

pub use admin_gate::{
    handler_fn, AdminCommand, AdminCommandOptions, AdminGate, CommandHandler, ConfirmationError,
    ConfirmationPort, ConfirmationPrompt, FnHandler,
};
