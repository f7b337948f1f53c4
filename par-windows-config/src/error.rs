//! Typed error variants for the par-windows-config crate.
//!
//! `Config::load` and `Config::save` still return `anyhow::Result`;
//! `ConfigError` values are coerced via the blanket `From` impl `anyhow`
//! provides, so callers can `downcast_ref::<ConfigError>()` to match on
//! specific failure modes.

use thiserror::Error;

/// Errors that can occur when loading, saving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string describes which field is invalid and why.
    #[error("Config validation error: {0}")]
    Validation(String),
}
