//! Infrastructure layer for SAR-CLI.
//!
//! Contains OS-facing adapters: the YAML config file, the rotating log
//! files, the terminal confirmation prompt, and environment variables.
//!
//! **Dependency rule**: this layer may depend on `application` and `sar_core`,
//! but MUST NOT be imported by the `application` layer.

pub mod confirmation;
pub mod context;
pub mod environment;
pub mod logging;
pub mod storage;
