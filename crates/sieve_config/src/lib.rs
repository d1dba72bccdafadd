//! Parsing and validation of `sieve.toml` configuration files.
//!
//! The configuration is optional: a project without `sieve.toml` runs every
//! built-in tool with its default arguments. When present, it can restrict
//! the tool set, pin the paths to scan, override tool invocations, and choose
//! how trailing diff hunks are handled.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_config_or_default, CONFIG_FILE_NAME};
pub use types::*;
