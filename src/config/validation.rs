//! Configuration validation
//!
//! Walks a deserialized [`Config`] and checks every structural and
//! cross-referential rule. Validation collects ALL violations (it never stops
//! at the first one) so a configuration author sees every defect in one pass.
//!
//! Sources and pairs are visited in name order; within an entity, rules are
//! checked in a fixed order. The output is therefore deterministic.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::config::resolved::{DateWindow, NameMode, parse_separator, parse_timezone};
use crate::config::schema::{Config, Pair, Source};
use crate::error::ValidationIssue;

/// The only schema version this validator understands.
pub const SUPPORTED_VERSION: i64 = 1;

/// The only parser kind currently supported.
pub const SUPPORTED_PARSER: &str = "csv";

const MISSING: &str = "required field is missing";

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Every violation found, in check order.
    pub errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
///
/// Holds only the accumulator for one run; the configuration itself is
/// never mutated.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    ///
    /// Top-level checks run first (version, timezone, source presence),
    /// then every source, then every pair.
    pub fn validate(&mut self, config: &Config) -> ValidationResult {
        self.errors.clear();

        self.validate_version(config.version);
        self.validate_default_timezone(&config.timezone);

        if config.sources.is_empty() {
            self.add_error("sources", "at least one source is required");
        }

        for (name, source) in &config.sources {
            self.validate_source(name, source);
        }

        for (name, pair) in &config.pairs {
            self.validate_pair(name, pair, &config.sources);
        }

        tracing::debug!(
            sources = config.sources.len(),
            pairs = config.pairs.len(),
            errors = self.errors.len(),
            "validated configuration"
        );

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
        }
    }

    // ========================================================================
    // Top-Level Validation
    // ========================================================================

    fn validate_version(&mut self, version: i64) {
        if version != SUPPORTED_VERSION {
            self.add_error(
                "version",
                format!("version must be {SUPPORTED_VERSION} (got {version})"),
            );
        }
    }

    fn validate_default_timezone(&mut self, timezone: &str) {
        if timezone.is_empty() {
            return;
        }
        if let Err(e) = parse_timezone(timezone) {
            self.add_error("timezone", format!("timezone {timezone:?} is invalid: {e}"));
        }
    }

    // ========================================================================
    // Source Validation
    // ========================================================================

    /// Validates one source and its parser settings.
    fn validate_source(&mut self, name: &str, source: &Source) {
        let base = format!("sources.{name}");
        let parser = &source.parser;

        if source.file_pattern.is_empty() {
            self.add_error(format!("{base}.file_pattern"), MISSING);
        }

        let base = format!("{base}.parser");

        if parser.kind != SUPPORTED_PARSER {
            self.add_error(
                format!("{base}.type"),
                format!("must be '{SUPPORTED_PARSER}' (got {:?})", parser.kind),
            );
        }

        for (field, value) in [
            ("date_col", &parser.date_col),
            ("date_layout", &parser.date_layout),
            ("amount_col", &parser.amount_col),
        ] {
            if value.is_empty() {
                self.add_error(format!("{base}.{field}"), MISSING);
            }
        }

        if let Err(e) = parse_separator(&parser.decimal) {
            self.add_error(format!("{base}.decimal"), e.to_string());
        }

        if let Err(e) = parse_separator(&parser.thousands) {
            self.add_error(format!("{base}.thousands"), e.to_string());
        }

        // Compared on the raw text so multi-character duplicates are caught too.
        if !parser.decimal.is_empty() && parser.decimal == parser.thousands {
            self.add_error(
                base.clone(),
                format!(
                    "decimal and thousands cannot be the same (both {:?})",
                    parser.decimal
                ),
            );
        }

        if parser.multiplier <= 0 {
            self.add_error(
                format!("{base}.multiplier"),
                format!("must be > 0 (got {})", parser.multiplier),
            );
        }

        if !parser.tz.is_empty() {
            if let Err(e) = parse_timezone(&parser.tz) {
                self.add_error(
                    format!("{base}.tz"),
                    format!("invalid timezone {:?}: {e}", parser.tz),
                );
            }
        }
    }

    // ========================================================================
    // Pair Validation
    // ========================================================================

    /// Validates one pair, including its references into `sources`.
    fn validate_pair(&mut self, name: &str, pair: &Pair, sources: &BTreeMap<String, Source>) {
        let base = format!("pairs.{name}");

        self.validate_source_ref(&format!("{base}.left"), &pair.left, sources);
        self.validate_source_ref(&format!("{base}.right"), &pair.right, sources);

        if pair.left == pair.right {
            self.add_error(base.clone(), "left and right cannot be the same source");
        }

        if !pair.date_window.is_empty() {
            if let Err(e) = DateWindow::from_str(&pair.date_window) {
                self.add_error(format!("{base}.date_window"), e.to_string());
            }
        }

        if pair.amount_tolerance_minor < 0 {
            self.add_error(
                format!("{base}.amount_tolerance_minor"),
                format!("must be >= 0 (got {})", pair.amount_tolerance_minor),
            );
        }

        if !pair.name_mode.is_empty() {
            if let Err(e) = NameMode::from_str(&pair.name_mode) {
                self.add_error(format!("{base}.name_mode"), e.to_string());
            }
        }
    }

    /// Checks that a pair side names an existing source.
    fn validate_source_ref(&mut self, path: &str, source: &str, sources: &BTreeMap<String, Source>) {
        if source.is_empty() {
            self.add_error(path, MISSING);
        } else if !sources.contains_key(source) {
            self.add_error(
                path,
                format!(
                    "unknown source {source:?} (available: [{}])",
                    source_names(sources).join(", ")
                ),
            );
        }
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Adds an error to the collection.
    fn add_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(path, message));
    }
}

/// Returns configured source names in sorted order.
fn source_names(sources: &BTreeMap<String, Source>) -> Vec<&str> {
    sources.keys().map(String::as_str).collect()
}

// ============================================================================
// Tests
// ============================================================================
