//! `Reconify` - configuration model and validator for a reconciliation engine
//!
//! This library loads a declarative description of CSV data sources and
//! reconciliation pairs, and certifies it before any reconciliation runs.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;

pub use config::{load, resolve, validate};
