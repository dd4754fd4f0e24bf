//! `reconify version`
//!
//! Reports the binary version together with the configuration schema it
//! understands, so a document can be checked against the right release.

use serde::Serialize;

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::config::validation::{SUPPORTED_PARSER, SUPPORTED_VERSION};
use crate::error::ReconifyError;

/// Build and schema information.
#[derive(Debug, Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    config_version: i64,
    parsers: [&'static str; 1],
}

impl VersionInfo {
    const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            config_version: SUPPORTED_VERSION,
            parsers: [SUPPORTED_PARSER],
        }
    }
}

/// Print version information.
///
/// # Errors
///
/// Returns an error if the JSON report cannot be serialized.
pub fn run(args: &VersionArgs) -> Result<(), ReconifyError> {
    let info = VersionInfo::current();

    match args.format {
        OutputFormat::Human => {
            println!(
                "{} {} (config version {}, parsers: {})",
                info.name,
                info.version,
                info.config_version,
                info.parsers.join(", ")
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&info)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_info_serializes_schema() {
        let value = serde_json::to_value(VersionInfo::current()).unwrap();
        assert_eq!(value["name"], "reconify");
        assert_eq!(value["config_version"], 1);
        assert_eq!(value["parsers"], serde_json::json!(["csv"]));
    }
}
