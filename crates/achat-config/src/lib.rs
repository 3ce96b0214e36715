//! achat configuration.
//!
//! TOML-based configuration with full validation. Every section has
//! defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

use std::path::Path;

pub use schema::{
    AchatConfig, EndpointConfig, IdentityConfig, LoggingConfig, NotificationsConfig,
    TranscriptConfig, CONFIG_SCHEMA_VERSION,
};

use achat_common::ConfigError;

/// Load config from `path` when given, otherwise from the platform default
/// location, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AchatConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
