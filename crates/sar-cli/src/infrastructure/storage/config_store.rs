//! YAML-backed configuration store.
//!
//! Reads and writes the [`ConfigTree`] to `<app home>/config.yaml`
//! (`~/.sar-cli/config.yaml` unless `SAR_CLI_HOME` overrides the directory).
//!
//! # What is in the file? (for beginners)
//!
//! One top-level map per application domain; values are primitives, lists or
//! nested maps.  Example:
//!
//! ```yaml
//! app:
//!   log_level: info
//!   name: sar-cli
//! server:
//!   host: localhost
//!   port: 3000
//! ```
//!
//! Callers address values with dot-paths: `store.get("server.port")`.
//!
//! # Load never fails, save does
//!
//! [`ConfigStore::load`] absorbs every problem it meets: a missing file is
//! replaced with the defaults (and written out), an unreadable or corrupt
//! file is logged as a warning and the defaults are used instead.  A command
//! can therefore always start.
//!
//! [`ConfigStore::save`] is the opposite: losing a user's change silently
//! would be worse than failing, so every I/O or serialization problem is
//! returned to the caller.
//!
//! # Concurrency
//!
//! There is no file locking.  Two processes saving at the same time race and
//! the last writer wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sar_core::config::{default_tree, ConfigPathError, ConfigTree, ConfigValue, DotPath};
use thiserror::Error;
use tracing::{debug, warn};

/// File name of the configuration file inside the app home directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Error type for configuration store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An operation ran before [`ConfigStore::load`].
    #[error("configuration has not been loaded")]
    NotLoaded,

    /// The dot-path key was malformed.
    #[error("invalid config key: {0}")]
    InvalidKey(#[from] ConfigPathError),

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The YAML content could not be parsed.
    #[error("failed to parse config YAML at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The tree could not be serialized to YAML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Where the tree came from during [`ConfigStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from the existing file (missing domains filled from defaults).
    File,
    /// The file did not exist; defaults were used and written out.
    CreatedDefaults,
    /// The file could not be read or parsed; defaults are in use.
    RecoveredDefaults,
}

/// The configuration store: an in-memory [`ConfigTree`] bound to one file.
///
/// Constructed unloaded.  Every operation except [`load`](Self::load),
/// [`reset`](Self::reset) and [`path`](Self::path) returns
/// [`ConfigError::NotLoaded`] until `load` has run.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    tree: Option<ConfigTree>,
}

impl ConfigStore {
    /// Creates an unloaded store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tree: None,
        }
    }

    /// Creates an unloaded store backed by `dir/config.yaml`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.tree.is_some()
    }

    /// Loads the tree from disk, substituting defaults when needed.
    ///
    /// Never returns an error; see the module docs.  Top-level domains that
    /// are missing from an existing file are filled in from the defaults.
    pub fn load(&mut self) -> LoadSource {
        if let Some(dir) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!("could not create config directory {}: {e}", dir.display());
            }
        }

        let (tree, source) = match self.read_file() {
            Ok(Some(mut tree)) => {
                let added = tree.fill_missing_from(&default_tree());
                if added > 0 {
                    debug!("filled {added} missing config domain(s) from defaults");
                }
                (tree, LoadSource::File)
            }
            Ok(None) => (default_tree(), LoadSource::CreatedDefaults),
            Err(e) => {
                warn!("failed to load configuration, using defaults: {e}");
                (default_tree(), LoadSource::RecoveredDefaults)
            }
        };
        self.tree = Some(tree);

        if source == LoadSource::CreatedDefaults {
            match self.save() {
                Ok(()) => debug!("wrote default configuration to {}", self.path.display()),
                Err(e) => warn!("could not write default configuration: {e}"),
            }
        }
        source
    }

    /// Reads and parses the file; `Ok(None)` when it does not exist.
    fn read_file(&self) -> Result<Option<ConfigTree>, ConfigError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_yaml::from_str::<ConfigTree>(&content)
                .map(Some)
                .map_err(|source| ConfigError::Parse {
                    path: self.path.clone(),
                    source,
                }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn tree(&self) -> Result<&ConfigTree, ConfigError> {
        self.tree.as_ref().ok_or(ConfigError::NotLoaded)
    }

    fn tree_mut(&mut self) -> Result<&mut ConfigTree, ConfigError> {
        self.tree.as_mut().ok_or(ConfigError::NotLoaded)
    }

    /// Looks up `key`.  Missing keys, non-map intermediates and malformed
    /// keys all yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotLoaded`] before [`load`](Self::load).
    pub fn get(&self, key: &str) -> Result<Option<&ConfigValue>, ConfigError> {
        let tree = self.tree()?;
        Ok(DotPath::parse(key).ok().and_then(|path| tree.get_path(&path)))
    }

    /// Like [`get`](Self::get) but returns a clone of `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotLoaded`] before [`load`](Self::load).
    pub fn get_or(&self, key: &str, default: ConfigValue) -> Result<ConfigValue, ConfigError> {
        Ok(self.get(key)?.cloned().unwrap_or(default))
    }

    /// Assigns `value` at `key` in memory, creating intermediate maps and
    /// overwriting non-map values along the way.  Call [`save`](Self::save)
    /// to persist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotLoaded`] before [`load`](Self::load) and
    /// [`ConfigError::InvalidKey`] for malformed keys.
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) -> Result<(), ConfigError> {
        let tree = self.tree_mut()?;
        let path = DotPath::parse(key)?;
        tree.set_path(&path, value.into());
        Ok(())
    }

    /// Removes `key`, returning whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotLoaded`] before [`load`](Self::load).
    pub fn unset(&mut self, key: &str) -> Result<bool, ConfigError> {
        let tree = self.tree_mut()?;
        Ok(DotPath::parse(key)
            .map(|path| tree.unset_path(&path))
            .unwrap_or(false))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::NotLoaded`] before [`load`](Self::load).
    pub fn has(&self, key: &str) -> Result<bool, ConfigError> {
        Ok(self.get(key)?.is_some())
    }

    /// Returns a copy of the whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotLoaded`] before [`load`](Self::load).
    pub fn get_all(&self) -> Result<ConfigTree, ConfigError> {
        self.tree().cloned()
    }

    /// Replaces the in-memory tree with the defaults and marks the store
    /// loaded.  Does not persist.
    pub fn reset(&mut self) {
        self.tree = Some(default_tree());
    }

    /// Serializes the whole tree and overwrites the file.
    ///
    /// Creates the parent directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotLoaded`] before [`load`](Self::load),
    /// [`ConfigError::Serialize`] if YAML serialization fails and
    /// [`ConfigError::Io`] for file-system failures.
    pub fn save(&self) -> Result<(), ConfigError> {
        let tree = self.tree()?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_yaml::to_string(tree).map_err(ConfigError::Serialize)?;
        fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
