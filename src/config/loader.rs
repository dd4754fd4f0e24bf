//! Configuration loader
//!
//! Reads a configuration document from disk and deserializes it into a
//! [`Config`] with no semantic interpretation:
//! 1. Size check against the configured limit
//! 2. Raw read, UTF-8 decoding (BOM stripped)
//! 3. YAML deserialization into the document types
//!
//! Validation is a separate step (see [`crate::config::validation`]);
//! [`ConfigLoader::load_resolved`] chains both for callers that want the
//! typed form.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::resolved::{ReconConfig, resolve};
use crate::config::schema::Config;
use crate::error::ConfigError;

/// Environment variable consulted when no explicit path is given.
pub const CONFIG_ENV_VAR: &str = "RECONIFY_CONFIG";

/// File name used when neither a path nor the environment variable is set.
pub const DEFAULT_CONFIG_FILE: &str = "reconify.yaml";

/// Default maximum configuration size (10 MiB).
const DEFAULT_MAX_CONFIG_SIZE: usize = 10 * 1024 * 1024;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
///
/// Passed explicitly into every load so loading stays a pure function of
/// its inputs.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Explicitly configured document path.
    pub config_path: Option<PathBuf>,

    /// Report load details at `info` rather than `debug`.
    pub verbose: bool,

    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            verbose: false,
            max_config_size: env_or("RECONIFY_MAX_CONFIG_SIZE", DEFAULT_MAX_CONFIG_SIZE),
        }
    }
}

impl LoaderOptions {
    /// Returns the document path these options point at.
    ///
    /// Resolution order: [`config_path`](Self::config_path), then
    /// `RECONIFY_CONFIG`, then `reconify.yaml` in the working directory.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        resolve_config_path(
            self.config_path.as_deref(),
            std::env::var_os(CONFIG_ENV_VAR),
        )
    }
}

/// Picks the configuration path from an explicit value, an environment
/// value, or the default file name, in that order. Empty values are skipped.
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>, env_value: Option<OsString>) -> PathBuf {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return path.to_path_buf();
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return PathBuf::from(value);
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Configuration loader.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Returns the options this loader was built with.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads the document at the path resolved from the loader options.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_configured(&self) -> Result<(PathBuf, Config), ConfigError> {
        let path = self.options.resolved_path();
        let config = self.load(&path)?;
        Ok((path, config))
    }

    /// Loads a configuration document.
    ///
    /// Absent fields take their zero value; nothing is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (not found, permission denied, I/O failure)
    /// - The file exceeds the configured size limit
    /// - The content is not UTF-8
    /// - The content is not valid YAML or does not fit the document shape
    pub fn load(&self, path: &Path) -> Result<Config, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let limit = self.options.max_config_size;
        if usize::try_from(metadata.len()).map_or(true, |size| size > limit) {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }

        let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = String::from_utf8(bytes).map_err(|source| ConfigError::Encoding {
            path: path.to_path_buf(),
            source,
        })?;

        self.load_from_str(&raw, path)
    }

    /// Deserializes a configuration from in-memory text.
    ///
    /// `origin` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the content is not valid YAML
    /// or does not fit the document shape.
    pub fn load_from_str(&self, content: &str, origin: &Path) -> Result<Config, ConfigError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        // An empty document (blank, comments only, or `null`) is the zero config.
        let config = if is_blank(content) {
            Config::default()
        } else {
            serde_yaml::from_str::<Option<Config>>(content)
                .map_err(|source| ConfigError::ParseError {
                    path: origin.to_path_buf(),
                    line: source.location().map(|l| l.line()),
                    source,
                })?
                .unwrap_or_default()
        };

        if self.options.verbose {
            tracing::info!(
                path = %origin.display(),
                sources = config.sources.len(),
                pairs = config.pairs.len(),
                "loaded configuration"
            );
        } else {
            tracing::debug!(
                path = %origin.display(),
                sources = config.sources.len(),
                pairs = config.pairs.len(),
                "loaded configuration"
            );
        }

        Ok(config)
    }

    /// Loads, validates, and resolves a configuration into its typed form.
    ///
    /// # Errors
    ///
    /// Returns any load error, or [`ConfigError::Invalid`] carrying every
    /// violation if validation fails.
    pub fn load_resolved(&self, path: &Path) -> Result<ReconConfig, ConfigError> {
        let config = self.load(path)?;
        resolve(&config).map_err(|errors| ConfigError::Invalid {
            path: path.to_path_buf(),
            errors,
        })
    }
}

/// Returns `true` if the text holds nothing but whitespace and comments.
fn is_blank(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

/// Reads a numeric limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
