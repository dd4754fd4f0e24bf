//! Command-line interface
//!
//! Argument definitions and command handlers for the `reconify` binary.

pub mod args;
pub mod commands;
