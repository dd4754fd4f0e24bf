//! Configuration module
//!
//! Handles loading and validation of reconciliation configuration files:
//! the raw document model, the loader, the validator, and the typed form a
//! valid document resolves into.

pub mod loader;
pub mod resolved;
pub mod schema;
pub mod validation;

use std::path::Path;

pub use loader::{CONFIG_ENV_VAR, ConfigLoader, DEFAULT_CONFIG_FILE, LoaderOptions, resolve_config_path};
pub use resolved::{CsvParser, DateWindow, NameMode, PairSpec, ReconConfig, SourceSpec, resolve};
pub use schema::{Config, Pair, ParserConfig, Source};
pub use validation::{ValidationResult, Validator};

use crate::error::{ConfigError, ValidationIssue};

/// Loads the configuration document at `path` with default loader options.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or deserialized.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    ConfigLoader::with_defaults().load(path)
}

/// Validates a configuration and returns every violation found.
///
/// An empty list means the configuration is ready to use.
#[must_use]
pub fn validate(config: &Config) -> Vec<ValidationIssue> {
    Validator::new().validate(config).errors
}
