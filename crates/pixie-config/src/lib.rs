//! Background configuration.
//!
//! TOML-based settings for the panel forwarder timings, the origin deny-list
//! and logging. Every section uses serde defaults so partial configs work.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BackgroundConfig, ForwardingConfig, LogLevel, LoggingConfig, OriginsConfig,
    CONFIG_SCHEMA_VERSION,
};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};

use pixie_common::ConfigError;
use std::path::Path;

/// Load the config from an explicit path when given, otherwise from the
/// platform default location. A file that fails validation is logged and
/// replaced by the defaults.
pub fn load_config(path: Option<&Path>) -> Result<BackgroundConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}
