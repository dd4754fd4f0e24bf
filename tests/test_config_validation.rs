mod common;

use common::ReconifyProcess;
use proptest::prelude::*;
use reconify::config::{Config, ConfigLoader, DateWindow, NameMode, Pair, load, resolve, validate};
use reconify::error::ConfigError;

fn load_fixture(name: &str) -> Config {
    load(&ReconifyProcess::fixture_path(name)).expect("fixture should load")
}

// ============================================================================
// Scenarios
// ============================================================================

/// A minimally valid document (one source, zero pairs) has no violations.
#[test]
fn minimal_document_is_valid() {
    let config = load_fixture("minimal.yaml");
    let errors = validate(&config);
    assert!(errors.is_empty(), "unexpected violations: {errors:?}");
    assert!(config.pairs.is_empty());
}

#[test]
fn full_document_is_valid_and_resolves() {
    let config = load_fixture("valid.yaml");
    assert!(validate(&config).is_empty());

    let resolved = resolve(&config).expect("valid document should resolve");
    let pair = &resolved.pairs["bank_vs_ledger"];
    assert_eq!(pair.date_window, Some(DateWindow::from_days(2)));
    assert_eq!(pair.name_mode, NameMode::Tokens);
    assert_eq!(
        resolved.timezone_for("ledger").map(|tz| tz.to_string()),
        Some("Europe/Berlin".to_string())
    );
    assert_eq!(
        resolved.timezone_for("bank").map(|tz| tz.to_string()),
        Some("America/New_York".to_string())
    );
    assert_eq!(resolved.sources["ledger"].parser.decimal, Some(','));
}

/// `version: 2` with otherwise-valid content yields exactly one violation.
#[test]
fn wrong_version_single_violation() {
    let errors = validate(&load_fixture("wrong_version.yaml"));
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].message.contains("version must be 1 (got 2)"));
}

#[test]
fn unknown_timezone_single_violation() {
    let errors = validate(&load_fixture("unknown_timezone.yaml"));
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].path, "timezone");
    assert!(errors[0].message.contains("Mars/Phobos"));
    assert!(errors[0].message.contains("unknown time zone"));
}

/// Every independent defect produces its own violation, in name order.
#[test]
fn independent_defects_are_all_reported() {
    let errors = validate(&load_fixture("many_defects.yaml"));
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "sources.bank.file_pattern",
            "sources.bank.parser",
            "sources.ledger.parser.type",
            "sources.ledger.parser.multiplier",
            "pairs.bank_vs_card.right",
            "pairs.bank_vs_card.date_window",
            "pairs.bank_vs_card.amount_tolerance_minor",
            "pairs.bank_vs_card.name_mode",
            "pairs.self_pair",
        ]
    );
    assert!(errors[1].message.contains("cannot be the same"));
    assert!(errors[4].message.contains("available: [bank, ledger]"));
    assert!(errors[5].message.contains("unit"));
}

#[test]
fn blank_document_loads_as_zero_config() {
    let config = load_fixture("empty.yaml");
    assert_eq!(config, Config::default());

    let errors = validate(&config);
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["version", "sources"]);
}

#[test]
fn malformed_yaml_is_a_load_error() {
    let err = load(&ReconifyProcess::fixture_path("bad_yaml.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }), "{err:?}");
}

#[test]
fn type_mismatch_is_a_load_error() {
    let err = load(&ReconifyProcess::fixture_path("type_mismatch.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }), "{err:?}");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn missing_file_is_a_load_error() {
    let err = load(&ReconifyProcess::fixture_path("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
}

#[test]
fn load_resolved_reports_every_violation() {
    let err = ConfigLoader::with_defaults()
        .load_resolved(&ReconifyProcess::fixture_path("many_defects.yaml"))
        .unwrap_err();
    match err {
        ConfigError::Invalid { errors, .. } => assert_eq!(errors.len(), 9),
        other => panic!("expected Invalid, got {other:?}"),
    }
}

// ============================================================================
// Properties
// ============================================================================

fn config_with_pair(left: &str, right: &str) -> Config {
    let mut config = load_fixture("valid.yaml");
    config.pairs.insert(
        "generated".to_string(),
        Pair {
            left: left.to_string(),
            right: right.to_string(),
            ..Pair::default()
        },
    );
    config
}

proptest! {
    /// Validating the same value twice yields identical lists.
    #[test]
    fn validation_is_idempotent(
        version in -3i64..5,
        multiplier in -10i64..10,
        tolerance in -10i64..10,
        window in "[0-9]{0,2}[a-zA-Z]{0,2}",
    ) {
        let mut config = load_fixture("valid.yaml");
        config.version = version;
        config.sources.get_mut("bank").unwrap().parser.multiplier = multiplier;
        let pair = config.pairs.get_mut("bank_vs_ledger").unwrap();
        pair.amount_tolerance_minor = tolerance;
        pair.date_window = window;

        prop_assert_eq!(validate(&config), validate(&config));
    }

    /// Each side naming an unknown source yields exactly one violation that
    /// lists every known source.
    #[test]
    fn unknown_sources_reported_once_per_side(
        left in "[a-z]{1,8}",
        right in "[a-z]{1,8}",
    ) {
        let config = config_with_pair(&left, &right);
        let errors = validate(&config);

        let unknown: Vec<_> = errors
            .iter()
            .filter(|e| e.message.starts_with("unknown source"))
            .collect();
        let expected = usize::from(!config.sources.contains_key(&left))
            + usize::from(!config.sources.contains_key(&right));
        prop_assert_eq!(unknown.len(), expected);
        for issue in unknown {
            prop_assert!(issue.message.contains("available: [bank, ledger]"));
        }
    }

    /// A pair pointing at the same name twice is always rejected.
    #[test]
    fn self_reference_always_rejected(name in "(bank|ledger|[a-z]{1,8})") {
        let errors = validate(&config_with_pair(&name, &name));
        let rejected = errors.iter().any(|e| {
            e.path == "pairs.generated" && e.message == "left and right cannot be the same source"
        });
        prop_assert!(rejected);
    }

    /// Any signed day count with a `d`/`D` unit parses.
    #[test]
    fn day_windows_parse(days in -10_000i32..10_000, upper in any::<bool>()) {
        let unit = if upper { "D" } else { "d" };
        let window: DateWindow = format!("{days}{unit}").parse().unwrap();
        prop_assert_eq!(window.days(), days);
    }
}
