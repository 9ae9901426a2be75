//! Parsing and validation of `relo.toml` configuration files.
//!
//! This crate reads the optional configuration file and produces a
//! strongly-typed [`ReloConfig`] holding the device database location, the
//! tile-family fallback table and site compatibility relations used by the
//! relocation engine.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
