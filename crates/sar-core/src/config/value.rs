//! Configuration values and the nested [`ConfigTree`].
//!
//! A configuration file is a tree: maps containing primitives, lists, or
//! further maps.  [`ConfigValue`] is one node of that tree and [`ConfigTree`]
//! is a map level.
//!
//! # Serde representation
//!
//! `ConfigValue` is `#[serde(untagged)]`, so it reads and writes the natural
//! YAML/JSON shape with no wrapper tags:
//!
//! ```yaml
//! server:
//!   host: localhost   # String
//!   port: 3000        # Integer
//!   tls: null         # Null
//!   tags: [a, b]      # List
//! ```
//!
//! Deserialization is hand-written rather than derived:
//!
//! - Integers stay integers.  Values above `i64::MAX` become
//!   [`ConfigValue::UInteger`] instead of losing precision as floats.
//! - Map keys that are YAML scalars other than strings (`80: http`,
//!   `true: on`) are read as their string form, so a file using them still
//!   loads.  Only list or map keys are rejected.
//!
//! # Traversal semantics
//!
//! - Reads ([`ConfigTree::get_path`], [`ConfigTree::has_path`]) stop at the
//!   first missing segment or non-map intermediate value.
//! - [`ConfigTree::set_path`] creates missing intermediate maps and
//!   **overwrites** any non-map value found on the way.
//! - [`ConfigTree::unset_path`] never creates anything; it is a no-op when an
//!   intermediate segment is missing.

use std::collections::btree_map::{self, BTreeMap};

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Serialize;

use super::path::DotPath;

/// One node in the configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Only for integers above `i64::MAX`.
    UInteger(u64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Tree(ConfigTree),
}

impl ConfigValue {
    /// Short human-readable name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) | ConfigValue::UInteger(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::List(_) => "list",
            ConfigValue::Tree(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ConfigValue::Integer(n) => u64::try_from(*n).ok(),
            ConfigValue::UInteger(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as `f64`; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(n) => Some(*n),
            ConfigValue::Integer(n) => Some(*n as f64),
            ConfigValue::UInteger(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            ConfigValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Integer(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Integer(i64::from(v))
    }
}

impl From<u64> for ConfigValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(ConfigValue::UInteger(v), ConfigValue::Integer)
    }
}

impl From<u16> for ConfigValue {
    fn from(v: u16) -> Self {
        ConfigValue::Integer(i64::from(v))
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::String(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::String(v)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(v: Vec<ConfigValue>) -> Self {
        ConfigValue::List(v)
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(v: ConfigTree) -> Self {
        ConfigValue::Tree(v)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ConfigValue::Null, Into::into)
    }
}

/// One level of the configuration tree: string keys to [`ConfigValue`]s.
///
/// Backed by a `BTreeMap` so serialized output has a stable key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigTree(BTreeMap<String, ConfigValue>);

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a direct child (no dot-path splitting).
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Inserts a direct child, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ConfigValue> {
        self.0.iter()
    }

    /// Resolves `path`, returning `None` as soon as a segment is absent or an
    /// intermediate value is not a map.
    pub fn get_path(&self, path: &DotPath<'_>) -> Option<&ConfigValue> {
        let (parents, leaf) = path.split_leaf();
        let mut node = self;
        for segment in parents {
            match node.0.get(*segment) {
                Some(ConfigValue::Tree(child)) => node = child,
                _ => return None,
            }
        }
        node.0.get(leaf)
    }

    pub fn has_path(&self, path: &DotPath<'_>) -> bool {
        self.get_path(path).is_some()
    }

    /// Assigns `value` at `path`, creating intermediate maps as needed.
    ///
    /// Any non-map value found at an intermediate segment is replaced by an
    /// empty map.  For example, setting `"server.port.tcp"` when
    /// `server.port = 3000` discards the `3000`.
    pub fn set_path(&mut self, path: &DotPath<'_>, value: ConfigValue) {
        let (parents, leaf) = path.split_leaf();
        self.set_under(parents, leaf, value);
    }

    fn set_under(&mut self, parents: &[&str], leaf: &str, value: ConfigValue) {
        match parents.split_first() {
            None => {
                self.0.insert(leaf.to_string(), value);
            }
            Some((head, rest)) => {
                let mut child = match self.0.remove(*head) {
                    Some(ConfigValue::Tree(tree)) => tree,
                    _ => ConfigTree::new(),
                };
                child.set_under(rest, leaf, value);
                self.0.insert((*head).to_string(), ConfigValue::Tree(child));
            }
        }
    }

    /// Removes the value at `path`.
    ///
    /// Returns `false` without touching the tree when any segment is missing.
    pub fn unset_path(&mut self, path: &DotPath<'_>) -> bool {
        let (parents, leaf) = path.split_leaf();
        let mut node = self;
        for segment in parents {
            match node.0.get_mut(*segment) {
                Some(ConfigValue::Tree(child)) => node = child,
                _ => return false,
            }
        }
        node.0.remove(leaf).is_some()
    }

    /// Copies every top-level entry of `defaults` whose key is absent here.
    ///
    /// Existing entries are left alone, even when they only partially cover
    /// the default sub-tree.  Returns the number of entries added.
    pub fn fill_missing_from(&mut self, defaults: &ConfigTree) -> usize {
        let mut added = 0;
        for (key, value) in defaults.iter() {
            if !self.0.contains_key(key) {
                self.0.insert(key.clone(), value.clone());
                added += 1;
            }
        }
        added
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigTree
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ── Deserialization ───────────────────────────────────────────────────────────

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for ConfigTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TreeVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = ConfigValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a configuration value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ConfigValue, D::Error> {
        ConfigValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ConfigValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<ConfigValue>()? {
            items.push(item);
        }
        Ok(ConfigValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<ConfigValue, A::Error> {
        TreeVisitor.visit_map(map).map(ConfigValue::Tree)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = ConfigTree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of configuration values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ConfigTree, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some(MapKey(key)) = map.next_key::<MapKey>()? {
            let value = map.next_value::<ConfigValue>()?;
            entries.insert(key, value);
        }
        Ok(ConfigTree(entries))
    }
}

/// A map key: any scalar, kept in its string form.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KeyVisitor).map(MapKey)
    }
}

struct KeyVisitor;

impl<'de> Visitor<'de> for KeyVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar map key")
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok("null".to_string())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok("null".to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }
}

impl<'a> IntoIterator for &'a ConfigTree {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = btree_map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
