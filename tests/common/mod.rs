//! Shared integration-test harness for running the `reconify` binary and
//! locating fixtures.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Helpers for invoking the built `reconify` binary.
pub struct ReconifyProcess;

impl ReconifyProcess {
    /// Runs `reconify` with the given arguments and waits for it to exit.
    ///
    /// `RECONIFY_CONFIG` is cleared so the caller's environment cannot leak
    /// into path resolution.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::command(args)
            .env_remove("RECONIFY_CONFIG")
            .output()
            .expect("failed to run reconify")
    }

    /// Runs `reconify` with `RECONIFY_CONFIG` set to `config`.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn spawn_with_env_config(args: &[&str], config: &str) -> Output {
        Self::command(args)
            .env("RECONIFY_CONFIG", config)
            .output()
            .expect("failed to run reconify")
    }

    fn command(args: &[&str]) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_reconify"));
        command
            .args(args)
            .env_remove("RECONIFY_LOG_LEVEL")
            .env_remove("RECONIFY_LOG_FORMAT")
            .env("NO_COLOR", "1");
        command
    }

    /// Returns the path to a test fixture.
    #[must_use]
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Returns a fixture path as an owned string for argument lists.
    #[must_use]
    pub fn fixture_arg(name: &str) -> String {
        Self::fixture_path(name)
            .to_str()
            .expect("non-UTF-8 fixture path")
            .to_string()
    }
}
