//! Dot-path keys for addressing values inside a [`ConfigTree`].
//!
//! A dot-path such as `"server.port"` is a sequence of non-empty segments
//! separated by `.`.  Each segment names one level of nesting:
//!
//! ```text
//! "server.port"  →  ["server", "port"]
//!
//! server:          ← segment 0 selects this map
//!   port: 3000     ← segment 1 selects this value
//! ```
//!
//! Parsing is strict: an empty key or any empty segment (`"a..b"`, `".a"`,
//! `"a."`) is rejected with [`ConfigPathError`].
//!
//! [`ConfigTree`]: super::ConfigTree

use std::fmt;

use thiserror::Error;

/// Error returned when a dot-path key is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    /// The key was the empty string.
    #[error("config key must not be empty")]
    Empty,

    /// One of the `.`-separated segments was empty.
    #[error("config key {key:?} contains an empty segment at position {position}")]
    EmptySegment { key: String, position: usize },
}

/// A parsed, validated dot-path.
///
/// Holds borrowed segments, so parsing never allocates per segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotPath<'a> {
    raw: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> DotPath<'a> {
    /// Parses `key` into its segments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigPathError::Empty`] for `""` and
    /// [`ConfigPathError::EmptySegment`] when any segment is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sar_core::config::DotPath;
    ///
    /// let path = DotPath::parse("database.pool.max").unwrap();
    /// assert_eq!(path.segments(), &["database", "pool", "max"]);
    /// assert!(DotPath::parse("database..max").is_err());
    /// ```
    pub fn parse(key: &'a str) -> Result<Self, ConfigPathError> {
        if key.is_empty() {
            return Err(ConfigPathError::Empty);
        }

        let segments: Vec<&str> = key.split('.').collect();
        if let Some(position) = segments.iter().position(|s| s.is_empty()) {
            return Err(ConfigPathError::EmptySegment {
                key: key.to_string(),
                position,
            });
        }

        Ok(Self { raw: key, segments })
    }

    /// All segments in traversal order.
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Splits the path into its parent segments and the final (leaf) segment.
    ///
    /// A parsed path always has at least one segment, so the leaf is always
    /// present.
    pub fn split_leaf(&self) -> (&[&'a str], &'a str) {
        match self.segments.split_last() {
            Some((leaf, parents)) => (parents, *leaf),
            // Unreachable for a parsed path; parse() rejects the empty key.
            None => (&[], self.raw),
        }
    }

    /// The original key text.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }
}

impl fmt::Display for DotPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}
