//! Diagnostic logging for `reconify` commands.
//!
//! Diagnostics always go to stderr so stdout carries only command results
//! (the validation report, the check-source verdict). `-v` raises the level
//! of this crate's own events; dependencies stay at `warn` unless
//! `RECONIFY_LOG_LEVEL` says otherwise.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable holding a full filter directive, e.g. `reconify=trace`.
pub const LOG_LEVEL_ENV_VAR: &str = "RECONIFY_LOG_LEVEL";

/// Crate levels selected by repeated `-v`, saturating at the last entry.
const CRATE_LEVELS: [&str; 4] = ["warn", "info", "debug", "trace"];

/// Rendering of diagnostic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Plain text lines.
    #[default]
    Human,
    /// One JSON object per event.
    Json,
}

/// Everything needed to install the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Output rendering
    pub format: LogFormat,
    /// Number of `-v` flags
    pub verbosity: u8,
    /// `--color` choice
    pub color: ColorChoice,
}

impl LogSettings {
    /// Filter directive for the given verbosity when no override is set.
    #[must_use]
    pub fn default_directive(&self) -> String {
        let index = usize::from(self.verbosity).min(CRATE_LEVELS.len() - 1);
        format!("warn,{}={}", env!("CARGO_CRATE_NAME"), CRATE_LEVELS[index])
    }

    /// Chooses the filter: a non-empty, parseable override wins.
    #[must_use]
    pub fn filter(&self, env_override: Option<&str>) -> EnvFilter {
        env_override
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .and_then(|d| EnvFilter::try_new(d).ok())
            .unwrap_or_else(|| EnvFilter::new(self.default_directive()))
    }

    /// Whether ANSI escapes should be written.
    ///
    /// `NO_COLOR` only affects the `auto` choice.
    #[must_use]
    pub const fn ansi(&self, stderr_is_terminal: bool, no_color: bool) -> bool {
        match self.color {
            ColorChoice::Auto => stderr_is_terminal && !no_color,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Installs the global subscriber.
///
/// Returns `false` if a subscriber was already installed, in which case the
/// existing one is left in place.
pub fn init_logging(settings: LogSettings) -> bool {
    let override_directive = std::env::var(LOG_LEVEL_ENV_VAR).ok();
    let filter = settings.filter(override_directive.as_deref());
    let ansi = settings.ansi(
        std::io::stderr().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
    );

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.verbosity >= 2)
        .with_writer(std::io::stderr);

    match settings.format {
        LogFormat::Human => builder.with_ansi(ansi).try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}
