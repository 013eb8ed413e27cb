//! Process environment readers.
//!
//! All environment lookups happen once, at startup, through an
//! [`Environment`] snapshot.  Nothing else in the crate calls
//! `std::env::var`, so tests can build an `Environment` from literal pairs
//! instead of mutating the real process environment.
//!
//! | Variable                 | Meaning                                    |
//! |--------------------------|--------------------------------------------|
//! | `SARU_ADMIN`/`SAR_ADMIN` | `"true"` grants admin rights               |
//! | `USER`/`USERNAME`        | actor recorded in audit entries            |
//! | `VISUAL`/`EDITOR`        | editor for `config edit` (default `vi`)    |
//! | `SAR_CLI_HOME`           | app home directory (default `~/.sar-cli`)  |
//! | `SAR_CLI_LOG`            | log level override                         |

use std::collections::HashMap;
use std::path::PathBuf;

use sar_core::admin::ADMIN_FLAG_VARS;
use sar_core::{AuthorizationContext, LogLevel};
use thiserror::Error;

pub const HOME_VAR: &str = "SAR_CLI_HOME";
pub const LOG_LEVEL_VAR: &str = "SAR_CLI_LOG";

/// App home directory name under the user's home.
pub const APP_DIR_NAME: &str = ".sar-cli";

/// Log directory name under the app home.
pub const LOG_DIR_NAME: &str = "logs";

const ACTOR_VARS: [&str; 2] = ["USER", "USERNAME"];
const EDITOR_VARS: [&str; 2] = ["VISUAL", "EDITOR"];
const DEFAULT_EDITOR: &str = "vi";
const UNKNOWN_ACTOR: &str = "unknown";

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("cannot determine the home directory; set {HOME_VAR}")]
    NoHomeDirectory,
}

/// Snapshot of the environment variables the CLI reads.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Captures the current process environment.  Variables that are not
    /// valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of `name`; empty values count as unset.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.var(name))
    }

    /// `$SAR_CLI_HOME`, else `<home>/.sar-cli`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::NoHomeDirectory`] when neither is known.
    pub fn app_home(&self) -> Result<PathBuf, EnvironmentError> {
        if let Some(home) = self.var(HOME_VAR) {
            return Ok(PathBuf::from(home));
        }
        dirs::home_dir()
            .map(|home| home.join(APP_DIR_NAME))
            .ok_or(EnvironmentError::NoHomeDirectory)
    }

    /// Admin rights from `SARU_ADMIN` / `SAR_ADMIN`.
    pub fn authorization(&self) -> AuthorizationContext {
        AuthorizationContext::from_flag_values(ADMIN_FLAG_VARS.iter().map(|name| self.var(name)))
    }

    /// User name for audit records.
    pub fn actor(&self) -> String {
        self.first_of(&ACTOR_VARS)
            .unwrap_or(UNKNOWN_ACTOR)
            .to_string()
    }

    /// Editor command for `config edit`.
    pub fn editor(&self) -> String {
        self.first_of(&EDITOR_VARS)
            .unwrap_or(DEFAULT_EDITOR)
            .to_string()
    }

    /// Level from `SAR_CLI_LOG`.  Unparseable values are ignored.
    pub fn log_level_override(&self) -> Option<LogLevel> {
        self.var(LOG_LEVEL_VAR)?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_requires_literal_true() {
        assert!(Environment::from_pairs([("SARU_ADMIN", "true")]).authorization().is_admin());
        assert!(Environment::from_pairs([("SAR_ADMIN", "true")]).authorization().is_admin());
        assert!(!Environment::from_pairs([("SARU_ADMIN", "1")]).authorization().is_admin());
        assert!(!Environment::from_pairs([("SARU_ADMIN", "TRUE")]).authorization().is_admin());
        assert!(!Environment::default().authorization().is_admin());
    }

    #[test]
    fn test_either_admin_flag_is_enough() {
        let env = Environment::from_pairs([("SARU_ADMIN", "false"), ("SAR_ADMIN", "true")]);
        assert!(env.authorization().is_admin());
    }

    #[test]
    fn test_actor_prefers_user_then_username_then_unknown() {
        assert_eq!(
            Environment::from_pairs([("USER", "alice"), ("USERNAME", "bob")]).actor(),
            "alice"
        );
        assert_eq!(Environment::from_pairs([("USERNAME", "bob")]).actor(), "bob");
        assert_eq!(Environment::default().actor(), "unknown");
    }

    #[test]
    fn test_editor_defaults_to_vi() {
        assert_eq!(Environment::from_pairs([("EDITOR", "nano")]).editor(), "nano");
        assert_eq!(
            Environment::from_pairs([("VISUAL", "code -w"), ("EDITOR", "nano")]).editor(),
            "code -w"
        );
        assert_eq!(Environment::from_pairs([("EDITOR", "")]).editor(), "vi");
    }

    #[test]
    fn test_app_home_override() {
        let env = Environment::from_pairs([(HOME_VAR, "/tmp/sar-home")]);
        assert_eq!(env.app_home().unwrap(), PathBuf::from("/tmp/sar-home"));
    }

    #[test]
    fn test_app_home_default_is_dot_dir_under_home() {
        if dirs::home_dir().is_none() {
            return;
        }
        let home = Environment::default().app_home().unwrap();
        assert!(home.ends_with(APP_DIR_NAME));
    }

    #[test]
    fn test_log_level_override_parses_or_ignores() {
        assert_eq!(
            Environment::from_pairs([(LOG_LEVEL_VAR, "debug")]).log_level_override(),
            Some(LogLevel::Debug)
        );
        assert_eq!(
            Environment::from_pairs([(LOG_LEVEL_VAR, "chatty")]).log_level_override(),
            None
        );
    }
}
