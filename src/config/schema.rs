//! Configuration document types
//!
//! These types mirror the YAML document one-to-one. Every field defaults to
//! its zero value when absent; no semantic interpretation happens here.
//! See [`crate::config::resolved`] for the typed form used after validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root of a reconciliation configuration document.
///
/// Sources and pairs are kept in ordered maps so that per-entity validation
/// visits them in lexicographic name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema version; only `1` is supported
    pub version: i64,

    /// Default IANA zone for every source (empty means unset)
    pub timezone: String,

    /// Data feeds by name
    pub sources: BTreeMap<String, Source>,

    /// Reconciliation units by name
    pub pairs: BTreeMap<String, Pair>,
}

// ============================================================================
// Sources
// ============================================================================

/// A named data feed: a family of CSV files and how to read them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    /// File-matching pattern (glob)
    pub file_pattern: String,

    /// How to turn a row into a transaction
    pub parser: ParserConfig,
}

/// CSV parsing settings for a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Parser kind; only `csv` is supported
    #[serde(rename = "type")]
    pub kind: String,

    /// Column holding the transaction date
    pub date_col: String,

    /// Layout the date column is written in
    pub date_layout: String,

    /// Per-source timezone override
    pub tz: String,

    /// Column holding the amount
    pub amount_col: String,

    /// Decimal separator (empty or a single character)
    pub decimal: String,

    /// Thousands separator (empty or a single character)
    pub thousands: String,

    /// Factor converting major units into minor units (e.g. 100 for cents)
    pub multiplier: i64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub currency_col: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub name_col: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub ref_col: String,
}

// ============================================================================
// Pairs
// ============================================================================

/// Two sources to be matched against each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pair {
    /// Name of the left-hand source
    pub left: String,

    /// Name of the right-hand source
    pub right: String,

    /// Date tolerance such as `2d`
    pub date_window: String,

    /// Amount tolerance in minor currency units
    pub amount_tolerance_minor: i64,

    /// Counterparty-name comparison mode (`none` or `tokens`)
    pub name_mode: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_take_zero_values() {
        let yaml = r"
sources:
  bank:
    parser:
      type: csv
pairs:
  p: {}
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.version, 0);
        assert!(config.timezone.is_empty());

        let bank = &config.sources["bank"];
        assert!(bank.file_pattern.is_empty());
        assert_eq!(bank.parser.kind, "csv");
        assert_eq!(bank.parser.multiplier, 0);
        assert!(bank.parser.decimal.is_empty());

        assert_eq!(config.pairs["p"], Pair::default());
    }

    #[test]
    fn parser_type_key_maps_to_kind() {
        let parser: ParserConfig = serde_yaml::from_str("type: xlsx\nmultiplier: 100").unwrap();
        assert_eq!(parser.kind, "xlsx");
        assert_eq!(parser.multiplier, 100);
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("version: one");
        assert!(result.is_err());
    }

    #[test]
    fn optional_columns_omitted_when_serializing() {
        let parser = ParserConfig {
            kind: "csv".to_string(),
            ..ParserConfig::default()
        };
        let yaml = serde_yaml::to_string(&parser).unwrap();
        assert!(!yaml.contains("currency_col"));
        assert!(yaml.contains("type: csv"));
    }
}
