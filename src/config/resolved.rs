//! Strongly-typed configuration
//!
//! A [`ReconConfig`] can only be built from a document the validator has
//! accepted. Raw strings such as `"2d"` or `"Europe/Berlin"` are parsed once
//! here, so downstream consumers never re-parse them.
//!
//! The parsing helpers in this module are also what the validator uses, so a
//! value the validator accepts always resolves.

use std::collections::BTreeMap;
use std::num::NonZeroU64;
use std::str::FromStr;

use chrono::TimeDelta;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::schema::{Config, Pair, ParserConfig, Source};
use crate::config::validation::Validator;
use crate::error::ValidationIssue;

// ============================================================================
// Timezones
// ============================================================================

/// A zone name that does not exist in the IANA database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time zone {name}: {reason}")]
pub struct UnknownTimezone {
    /// The name that failed to resolve
    pub name: String,
    /// Reason reported by the zone database
    pub reason: String,
}

/// Resolves an IANA zone name such as `America/New_York`.
///
/// # Errors
///
/// Returns [`UnknownTimezone`] if the name is not in the zone database.
/// `Local` is rejected: a document must name the zone it was written for.
pub fn parse_timezone(name: &str) -> Result<Tz, UnknownTimezone> {
    Tz::from_str(name).map_err(|e| UnknownTimezone {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

// ============================================================================
// Date Window
// ============================================================================

/// Maximum date distance, in whole days, between two matched transactions.
///
/// The count is signed: `-1d` is well-formed. A negative window admits no
/// date difference at all, see [`DateWindow::is_negative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DateWindow {
    days: i32,
}

/// Why a date window string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateWindowError {
    /// Not of the form `<integer><unit>`
    #[error("invalid format (expected format like '1d', '2d'): {reason}")]
    Format {
        /// What was wrong with the text
        reason: String,
    },

    /// Well-formed but the unit is not days
    #[error("unit must be 'd' or 'D' (got {unit:?})")]
    Unit {
        /// The unit that was given
        unit: String,
    },
}

impl DateWindow {
    /// Creates a window of the given number of days.
    #[must_use]
    pub const fn from_days(days: i32) -> Self {
        Self { days }
    }

    /// Number of days in the window.
    #[must_use]
    pub const fn days(self) -> i32 {
        self.days
    }

    /// Whether the window was written with a negative day count.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.days < 0
    }

    /// The window as a signed duration.
    #[must_use]
    pub fn as_duration(self) -> TimeDelta {
        TimeDelta::days(i64::from(self.days))
    }
}

impl FromStr for DateWindow {
    type Err = DateWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Optionally signed integer prefix
        let number_end = trimmed
            .char_indices()
            .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '+' || c == '-'))))
            .map_or(trimmed.len(), |(i, _)| i);
        let (number, rest) = trimmed.split_at(number_end);

        let days: i64 = number.parse().map_err(|e| DateWindowError::Format {
            reason: if number.is_empty() {
                "expected an integer day count".to_string()
            } else {
                format!("{e}")
            },
        })?;

        let Some(unit) = rest.split_whitespace().next() else {
            return Err(DateWindowError::Format {
                reason: "missing unit".to_string(),
            });
        };

        if unit != "d" && unit != "D" {
            return Err(DateWindowError::Unit {
                unit: unit.to_string(),
            });
        }

        let days = i32::try_from(days).map_err(|_| DateWindowError::Format {
            reason: format!("day count {days} is out of range"),
        })?;

        Ok(Self { days })
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d", self.days)
    }
}

// ============================================================================
// Name Mode
// ============================================================================

/// Strategy for comparing counterparty names during matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMode {
    /// Names are not compared
    #[default]
    None,
    /// Normalized word-token sets are compared
    Tokens,
}

/// A name mode outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("must be one of [none, tokens] (got {0:?})")]
pub struct UnknownNameMode(pub String);

impl NameMode {
    /// Returns the document spelling of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Tokens => "tokens",
        }
    }
}

impl FromStr for NameMode {
    type Err = UnknownNameMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "tokens" => Ok(Self::Tokens),
            other => Err(UnknownNameMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for NameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Separators
// ============================================================================

/// A separator longer than one character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("must be a single character or empty (got {0:?})")]
pub struct InvalidSeparator(pub String);

/// Parses a decimal or thousands separator. Empty means "not set".
///
/// # Errors
///
/// Returns [`InvalidSeparator`] for values of more than one character.
pub fn parse_separator(value: &str) -> Result<Option<char>, InvalidSeparator> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        (Some(_), Some(_)) => Err(InvalidSeparator(value.to_string())),
    }
}

// ============================================================================
// Typed Configuration
// ============================================================================

/// A validated reconciliation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconConfig {
    /// Schema version
    pub version: i64,
    /// Default zone for every source
    pub timezone: Option<Tz>,
    /// Data feeds by name
    pub sources: BTreeMap<String, SourceSpec>,
    /// Reconciliation units by name
    pub pairs: BTreeMap<String, PairSpec>,
}

/// A validated data feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// File-matching glob
    pub file_pattern: String,
    /// CSV reading settings
    pub parser: CsvParser,
}

/// Validated CSV reading settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvParser {
    pub date_col: String,
    pub date_layout: String,
    /// Zone override for this source
    pub tz: Option<Tz>,
    pub amount_col: String,
    pub decimal: Option<char>,
    pub thousands: Option<char>,
    /// Major-to-minor unit factor
    pub multiplier: NonZeroU64,
    pub currency_col: Option<String>,
    pub name_col: Option<String>,
    pub ref_col: Option<String>,
}

/// A validated reconciliation pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSpec {
    pub left: String,
    pub right: String,
    /// `None` when the document leaves the window unset
    pub date_window: Option<DateWindow>,
    pub amount_tolerance_minor: u64,
    pub name_mode: NameMode,
}

impl SourceSpec {
    /// Returns the zone this source's dates are interpreted in.
    ///
    /// The per-source override wins over the configuration default.
    #[must_use]
    pub fn effective_timezone(&self, default: Option<Tz>) -> Option<Tz> {
        self.parser.tz.or(default)
    }
}

impl CsvParser {
    /// Every column this parser reads, required ones first.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![self.date_col.as_str(), self.amount_col.as_str()];
        columns.extend(
            [&self.currency_col, &self.name_col, &self.ref_col]
                .into_iter()
                .flatten()
                .map(String::as_str),
        );
        columns
    }
}

impl ReconConfig {
    /// Looks up a source by name.
    #[must_use]
    pub fn source(&self, name: &str) -> Option<&SourceSpec> {
        self.sources.get(name)
    }

    /// Returns the zone a source's dates are interpreted in.
    #[must_use]
    pub fn timezone_for(&self, source: &str) -> Option<Tz> {
        self.sources
            .get(source)
            .and_then(|s| s.effective_timezone(self.timezone))
    }

    fn build(config: &Config) -> Result<Self, ValidationIssue> {
        let timezone = optional(&config.timezone, parse_timezone)
            .map_err(|e| ValidationIssue::new("timezone", e.to_string()))?;

        let sources = config
            .sources
            .iter()
            .map(|(name, source)| Ok((name.clone(), build_source(name, source)?)))
            .collect::<Result<BTreeMap<_, _>, ValidationIssue>>()?;

        let pairs = config
            .pairs
            .iter()
            .map(|(name, pair)| Ok((name.clone(), build_pair(name, pair)?)))
            .collect::<Result<BTreeMap<_, _>, ValidationIssue>>()?;

        Ok(Self {
            version: config.version,
            timezone,
            sources,
            pairs,
        })
    }
}

/// Validates a configuration and, if it has no violations, returns its
/// typed form.
///
/// # Errors
///
/// Returns every violation the validator found.
pub fn resolve(config: &Config) -> Result<ReconConfig, Vec<ValidationIssue>> {
    let result = Validator::new().validate(config);
    if result.has_errors() {
        return Err(result.errors);
    }

    ReconConfig::build(config).map_err(|issue| vec![issue])
}

fn build_source(name: &str, source: &Source) -> Result<SourceSpec, ValidationIssue> {
    let path = format!("sources.{name}.parser");
    let ParserConfig {
        kind: _,
        date_col,
        date_layout,
        tz,
        amount_col,
        decimal,
        thousands,
        multiplier,
        currency_col,
        name_col,
        ref_col,
    } = &source.parser;

    let tz = optional(tz, parse_timezone)
        .map_err(|e| ValidationIssue::new(format!("{path}.tz"), e.to_string()))?;
    let decimal = parse_separator(decimal)
        .map_err(|e| ValidationIssue::new(format!("{path}.decimal"), e.to_string()))?;
    let thousands = parse_separator(thousands)
        .map_err(|e| ValidationIssue::new(format!("{path}.thousands"), e.to_string()))?;
    let multiplier = u64::try_from(*multiplier)
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or_else(|| {
            ValidationIssue::new(
                format!("{path}.multiplier"),
                format!("must be > 0 (got {multiplier})"),
            )
        })?;

    Ok(SourceSpec {
        file_pattern: source.file_pattern.clone(),
        parser: CsvParser {
            date_col: date_col.clone(),
            date_layout: date_layout.clone(),
            tz,
            amount_col: amount_col.clone(),
            decimal,
            thousands,
            multiplier,
            currency_col: non_empty(currency_col),
            name_col: non_empty(name_col),
            ref_col: non_empty(ref_col),
        },
    })
}

fn build_pair(name: &str, pair: &Pair) -> Result<PairSpec, ValidationIssue> {
    let path = format!("pairs.{name}");

    let date_window = optional(&pair.date_window, DateWindow::from_str)
        .map_err(|e| ValidationIssue::new(format!("{path}.date_window"), e.to_string()))?;
    let amount_tolerance_minor = u64::try_from(pair.amount_tolerance_minor).map_err(|_| {
        ValidationIssue::new(
            format!("{path}.amount_tolerance_minor"),
            format!("must be >= 0 (got {})", pair.amount_tolerance_minor),
        )
    })?;
    let name_mode = optional(&pair.name_mode, NameMode::from_str)
        .map_err(|e| ValidationIssue::new(format!("{path}.name_mode"), e.to_string()))?
        .unwrap_or_default();

    Ok(PairSpec {
        left: pair.left.clone(),
        right: pair.right.clone(),
        date_window,
        amount_tolerance_minor,
        name_mode,
    })
}

/// Applies `parse` to a value where the empty string means "unset".
fn optional<T, E>(value: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> Result<Option<T>, E> {
    if value.is_empty() {
        Ok(None)
    } else {
        parse(value).map(Some)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
