//! Hierarchical configuration data.
//!
//! Pure data structures only; reading and writing the config file is done by
//! the `ConfigStore` in the `sar-cli` infrastructure layer.
//!
//! - **`value`**    – [`ConfigValue`] and the nested [`ConfigTree`] map with
//!   dot-path traversal.
//! - **`path`**     – [`DotPath`] parsing and validation.
//! - **`defaults`** – the built-in default tree written on first run.

pub mod defaults;
pub mod path;
pub mod value;

pub use defaults::{default_tree, DEFAULT_DOMAINS};
pub use path::{ConfigPathError, DotPath};
pub use value::{ConfigTree, ConfigValue};
