//! The runtime context handed to every command handler.
//!
//! Built once in `main`:
//!
//! 1. [`build_log_sink`] creates the shared sink so the `tracing` layer can
//!    be installed before anything else logs.
//! 2. [`AppContext::initialize`] loads the configuration and settles the log
//!    level (`--verbose` → `SAR_CLI_LOG` → `app.log_level` → INFO).

use std::path::Path;
use std::sync::Arc;

use sar_core::LogLevel;

use super::environment::{Environment, LOG_DIR_NAME};
use super::logging::{LogSink, LogSinkConfig};
use super::storage::ConfigStore;

/// Config key holding the persisted log level.
pub const LOG_LEVEL_KEY: &str = "app.log_level";

/// Global flags that shape the runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub verbose: bool,
    pub quiet: bool,
    pub no_file_log: bool,
}

/// Creates the shared sink writing to `<home>/logs`.
pub fn build_log_sink(home: &Path, options: RuntimeOptions) -> Arc<LogSink> {
    Arc::new(LogSink::new(LogSinkConfig {
        silent: options.quiet,
        file_logging: !options.no_file_log,
        ..LogSinkConfig::new(home.join(LOG_DIR_NAME))
    }))
}

/// Config store, shared logger and verbosity for one CLI run.
pub struct AppContext {
    pub config: ConfigStore,
    pub logger: Arc<LogSink>,
    pub verbose: bool,
}

impl AppContext {
    /// Loads `<home>/config.yaml` and applies the effective log level to
    /// `logger`.
    pub fn initialize(
        home: &Path,
        logger: Arc<LogSink>,
        env: &Environment,
        options: RuntimeOptions,
    ) -> Self {
        let mut config = ConfigStore::in_dir(home);
        let source = config.load();
        tracing::debug!(source = ?source, path = %config.path().display(), "configuration loaded");

        let level = effective_level(&config, env, options);
        logger.set_level(level);

        Self {
            config,
            logger,
            verbose: options.verbose,
        }
    }
}

/// `--verbose` wins, then `SAR_CLI_LOG`, then the config file, then INFO.
pub fn effective_level(config: &ConfigStore, env: &Environment, options: RuntimeOptions) -> LogLevel {
    if options.verbose {
        return LogLevel::Debug;
    }
    if let Some(level) = env.log_level_override() {
        return level;
    }
    config
        .get(LOG_LEVEL_KEY)
        .ok()
        .flatten()
        .and_then(|value| value.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}
