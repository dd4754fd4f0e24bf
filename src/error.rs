//! Error types for `Reconify`
//!
//! Two disjoint kinds live here: [`ConfigError`] is raised when a document
//! cannot be loaded at all, while [`ValidationIssue`] values are plain data
//! collected by the validator and returned as a list.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `Reconify` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `Reconify` commands.
///
/// Aggregates the domain errors and maps each one to an exit code.
#[derive(Debug, Error)]
pub enum ReconifyError {
    /// Configuration loading error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configuration loaded but has violations
    #[error("{path} is invalid ({count} violation(s))")]
    ValidationFailed {
        /// Path to the configuration file
        path: PathBuf,
        /// Number of violations reported
        count: usize,
    },

    /// A command referenced a source that is not configured
    #[error("unknown source {name:?} (available: [{}])", available.join(", "))]
    UnknownSource {
        /// Requested source name
        name: String,
        /// Configured source names, sorted
        available: Vec<String>,
    },

    /// A CSV file lacks columns its source mapping requires
    #[error("{path}: missing column(s) {}", missing.join(", "))]
    MissingColumns {
        /// Path to the CSV file
        path: PathBuf,
        /// Column names that were not found in the header
        missing: Vec<String>,
    },

    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReconifyError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(ConfigError::Io { .. }) => ExitCode::IO_ERROR,
            Self::Config(_) | Self::ValidationFailed { .. } | Self::UnknownSource { .. } => {
                ExitCode::CONFIG_ERROR
            }
            Self::MissingColumns { .. } | Self::Csv(_) | Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
///
/// Always fatal to the calling operation: there is no partial-document
/// recovery. Each variant carries the underlying cause.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The document exceeds the configured size limit
    #[error("config file {path} is {size} bytes (maximum: {limit})")]
    TooLarge {
        /// Path to the configuration file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Limit in bytes
        limit: usize,
    },

    /// The document is not UTF-8 text
    #[error("config file {path} is not valid UTF-8: {source}")]
    Encoding {
        /// Path to the configuration file
        path: PathBuf,
        /// Position of the first invalid byte
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// YAML syntax error or shape mismatch
    #[error("failed to parse YAML in {path}{}: {source}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error reported by the YAML deserializer
        #[source]
        source: serde_yaml::Error,
    },

    /// The document loaded but failed validation
    #[error("validation failed for {path}")]
    Invalid {
        /// Path to the configuration file
        path: PathBuf,
        /// Every violation found
        errors: Vec<ValidationIssue>,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single defect found during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path to the problematic field (e.g. `sources.bank.parser.decimal`)
    pub path: String,
    /// Description of the defect
    pub message: String,
}

impl ValidationIssue {
    /// Creates an issue for the given field path.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Top-level messages are already full sentences led by their field.
        if self.path.is_empty() || self.message.starts_with(&self.path) {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_display_prefixes_path() {
        let issue = ValidationIssue::new(
            "sources.bank.file_pattern",
            "required field is missing",
        );
        assert_eq!(
            issue.to_string(),
            "sources.bank.file_pattern: required field is missing"
        );
    }

    #[test]
    fn issue_display_skips_redundant_path() {
        let issue = ValidationIssue::new("version", "version must be 1 (got 2)");
        assert_eq!(issue.to_string(), "version must be 1 (got 2)");
    }

    #[test]
    fn exit_codes_by_variant() {
        let io = ReconifyError::Config(ConfigError::Io {
            path: PathBuf::from("reconify.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        assert_eq!(io.exit_code(), ExitCode::IO_ERROR);

        let invalid = ReconifyError::ValidationFailed {
            path: PathBuf::from("reconify.yaml"),
            count: 3,
        };
        assert_eq!(invalid.exit_code(), ExitCode::CONFIG_ERROR);

        let encoding = ReconifyError::Config(ConfigError::Encoding {
            path: PathBuf::from("reconify.yaml"),
            source: String::from_utf8(vec![0xff, 0xfe]).unwrap_err(),
        });
        assert_eq!(encoding.exit_code(), ExitCode::CONFIG_ERROR);

        let missing = ReconifyError::MissingColumns {
            path: PathBuf::from("bank.csv"),
            missing: vec!["Amount".to_string()],
        };
        assert_eq!(missing.exit_code(), ExitCode::ERROR);
        assert!(missing.to_string().contains("Amount"));
    }

    #[test]
    fn unknown_source_lists_available() {
        let err = ReconifyError::UnknownSource {
            name: "card".to_string(),
            available: vec!["bank".to_string(), "ledger".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"unknown source "card" (available: [bank, ledger])"#
        );
    }
}
