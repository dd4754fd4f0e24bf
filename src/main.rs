//! `Reconify` command-line entry point

use clap::Parser;

use reconify::cli::args::Cli;
use reconify::cli::commands;
use reconify::error::{ConfigError, ExitCode, ReconifyError};
use reconify::observability::{LogSettings, init_logging};

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(LogSettings {
            format: cli.log_format,
            verbosity: cli.verbose,
            color: cli.color,
        });
    }

    match commands::dispatch(&cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            if let ReconifyError::Config(ConfigError::Invalid { errors, .. }) = &e {
                for issue in errors {
                    eprintln!("  - {issue}");
                }
            }
            std::process::exit(e.exit_code());
        }
    }
}
