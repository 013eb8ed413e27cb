//! The built-in default configuration tree.
//!
//! Written to disk on first run and used as the fallback whenever the config
//! file cannot be parsed.  Each top-level key is one application domain.

use super::value::{ConfigTree, ConfigValue};

/// Top-level domains present in every freshly created configuration.
pub const DEFAULT_DOMAINS: [&str; 8] = [
    "app",
    "backup",
    "database",
    "deploy",
    "monitoring",
    "project",
    "security",
    "server",
];

fn section<const N: usize>(entries: [(&str, ConfigValue); N]) -> ConfigValue {
    ConfigValue::Tree(ConfigTree::from_iter(entries))
}

/// Builds the default configuration tree.
pub fn default_tree() -> ConfigTree {
    ConfigTree::from_iter([
        (
            "app",
            section([
                ("name", "sar-cli".into()),
                ("version", env!("CARGO_PKG_VERSION").into()),
                ("log_level", "info".into()),
                ("verbose", false.into()),
            ]),
        ),
        (
            "project",
            section([
                ("name", ConfigValue::Null),
                ("root", ".".into()),
                ("language", ConfigValue::Null),
            ]),
        ),
        (
            "deploy",
            section([
                ("environment", "development".into()),
                ("strategy", "rolling".into()),
                ("auto_rollback", true.into()),
            ]),
        ),
        (
            "server",
            section([("host", "localhost".into()), ("port", 3000.into())]),
        ),
        (
            "database",
            section([
                ("host", "localhost".into()),
                ("port", 5432.into()),
                ("name", "sar".into()),
            ]),
        ),
        (
            "monitoring",
            section([
                ("enabled", true.into()),
                ("interval_secs", 60.into()),
                ("alert_threshold", 0.9.into()),
            ]),
        ),
        (
            "security",
            section([
                ("audit_log", true.into()),
                ("require_confirmation", true.into()),
            ]),
        ),
        (
            "backup",
            section([
                ("directory", "backups".into()),
                ("retention", 7.into()),
                ("compress", true.into()),
            ]),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DotPath;

    #[test]
    fn test_default_tree_contains_every_domain() {
        let tree = default_tree();
        for domain in DEFAULT_DOMAINS {
            assert!(
                tree.get(domain).and_then(ConfigValue::as_tree).is_some(),
                "default tree must contain a `{domain}` map"
            );
        }
        assert_eq!(tree.len(), DEFAULT_DOMAINS.len());
    }

    #[test]
    fn test_default_log_level_is_info() {
        let tree = default_tree();
        let path = DotPath::parse("app.log_level").unwrap();
        assert_eq!(tree.get_path(&path), Some(&ConfigValue::from("info")));
    }

    #[test]
    fn test_default_server_port_is_integer() {
        let tree = default_tree();
        let path = DotPath::parse("server.port").unwrap();
        assert_eq!(tree.get_path(&path).and_then(ConfigValue::as_i64), Some(3000));
    }
}
