//! Configuration commands
//!
//! Implements `config validate` and `config check-source`.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{CheckSourceArgs, ConfigValidateArgs, OutputFormat};
use crate::config::{ConfigLoader, CsvParser, LoaderOptions, SourceSpec};
use crate::error::{ReconifyError, ValidationIssue};

/// JSON shape printed by `config validate --format json`.
#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    path: String,
    valid: bool,
    errors: &'a [ValidationIssue],
}

/// Validate the configuration file without running a reconciliation.
///
/// Prints one line per violation, or a single success line.
///
/// # Errors
///
/// Returns a config error if the file cannot be loaded, or
/// [`ReconifyError::ValidationFailed`] if any violation was found.
pub fn validate(options: &LoaderOptions, args: &ConfigValidateArgs) -> Result<(), ReconifyError> {
    let path = options.resolved_path();
    tracing::info!(file = %path.display(), "validating configuration");

    let config = ConfigLoader::new(options.clone()).load(&path)?;
    let errors = crate::config::validate(&config);

    match args.format {
        OutputFormat::Human => {
            if errors.is_empty() {
                println!("{} is valid", path.display());
            } else {
                eprintln!("{} is invalid:", path.display());
                for issue in &errors {
                    eprintln!("  - {issue}");
                }
            }
        }
        OutputFormat::Json => {
            let report = ValidationReport {
                path: path.display().to_string(),
                valid: errors.is_empty(),
                errors: &errors,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if errors.is_empty() {
        tracing::info!(file = %path.display(), "configuration valid");
        Ok(())
    } else {
        Err(ReconifyError::ValidationFailed {
            path,
            count: errors.len(),
        })
    }
}

/// Check that a CSV file's header carries every column a source reads.
///
/// The configuration must be valid. A file name that does not match the
/// source's `file_pattern` is reported as a warning only.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid,
/// the source is unknown, the CSV cannot be read, or columns are missing.
pub fn check_source(options: &LoaderOptions, args: &CheckSourceArgs) -> Result<(), ReconifyError> {
    let path = options.resolved_path();
    let config = ConfigLoader::new(options.clone()).load_resolved(&path)?;

    let source = config
        .source(&args.source)
        .ok_or_else(|| ReconifyError::UnknownSource {
            name: args.source.clone(),
            available: config.sources.keys().cloned().collect(),
        })?;

    tracing::info!(
        source = %args.source,
        file = %args.file.display(),
        "checking source"
    );

    if !matches_file_pattern(source, &args.file) {
        tracing::warn!(
            pattern = %source.file_pattern,
            file = %args.file.display(),
            "file name does not match the source's file_pattern"
        );
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&args.file)?;
    let headers = reader.headers()?;

    let missing = missing_columns(&source.parser, headers);
    if !missing.is_empty() {
        return Err(ReconifyError::MissingColumns {
            path: args.file.clone(),
            missing,
        });
    }

    println!(
        "{} matches source {:?}",
        args.file.display(),
        args.source
    );
    Ok(())
}

/// Returns the configured columns absent from a CSV header, in parser order.
fn missing_columns(parser: &CsvParser, headers: &csv::StringRecord) -> Vec<String> {
    let present: Vec<&str> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();

    parser
        .columns()
        .into_iter()
        .filter(|column| !present.contains(column))
        .map(str::to_string)
        .collect()
}

/// Matches either the full path or just the file name against the glob.
fn matches_file_pattern(source: &SourceSpec, file: &Path) -> bool {
    let Ok(pattern) = glob::Pattern::new(&source.file_pattern) else {
        tracing::warn!(pattern = %source.file_pattern, "file_pattern is not a valid glob");
        return false;
    };

    pattern.matches_path(file)
        || file
            .file_name()
            .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
}
