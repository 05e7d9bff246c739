//! Repunct CLI library
//!
//! Command-line front end for the windowed punctuation restoration
//! pipeline: vocabulary construction, training data preparation, a
//! count-based baseline, restoration and error reporting.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
