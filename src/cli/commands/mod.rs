//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod config;
pub mod version;

use crate::cli::args::{Cli, Commands, ConfigSubcommand};
use crate::error::ReconifyError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), ReconifyError> {
    let options = cli.loader_options();

    match &cli.command {
        Commands::Config(cmd) => match &cmd.subcommand {
            ConfigSubcommand::Validate(args) => config::validate(&options, args),
            ConfigSubcommand::CheckSource(args) => config::check_source(&options, args),
        },
        Commands::Version(args) => version::run(args),
    }
}
