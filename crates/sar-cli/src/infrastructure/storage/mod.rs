//! Storage infrastructure: configuration file persistence.
//!
//! This module is the thin adapter between the in-memory [`ConfigTree`] and
//! the file system.  The `config_store` sub-module handles:
//!
//! - Reading the YAML configuration file from the app home directory.
//! - Writing changes back to disk when a command modifies settings.
//! - Substituting the built-in defaults when the file does not exist yet
//!   (first run) or cannot be parsed.
//!
//! [`ConfigTree`]: sar_core::config::ConfigTree

pub mod config_store;

pub use config_store::{ConfigError, ConfigStore, LoadSource, CONFIG_FILE_NAME};
