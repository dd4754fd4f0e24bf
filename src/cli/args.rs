//! CLI argument definitions
//!
//! All Clap derive structs for `Reconify` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::LoaderOptions;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// A developer-first reconciliation engine.
#[derive(Parser, Debug)]
#[command(name = "reconify", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file [default: $RECONIFY_CONFIG, then reconify.yaml].
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "RECONIFY_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "RECONIFY_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Builds loader options from the global flags.
    #[must_use]
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            config_path: self.config.clone(),
            verbose: self.verbose > 0,
            ..LoaderOptions::default()
        }
    }
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration management commands.
    Config(ConfigCommand),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Config Command
// ============================================================================

/// Configuration management commands.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Config subcommand.
    #[command(subcommand)]
    pub subcommand: ConfigSubcommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Validate configuration file structure.
    Validate(ConfigValidateArgs),

    /// Check that a CSV file carries the columns a source expects.
    CheckSource(CheckSourceArgs),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
pub struct ConfigValidateArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `config check-source`.
#[derive(Args, Debug)]
pub struct CheckSourceArgs {
    /// Source name to check.
    #[arg(long)]
    pub source: String,

    /// CSV file to check against the source.
    #[arg(long)]
    pub file: PathBuf,
}

// ============================================================================
// Version Command
// ============================================================================

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}
