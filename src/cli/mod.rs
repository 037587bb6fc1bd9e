//! CLI module
//!
//! Command-line interface for running the source.
//!
//! # Commands
//!
//! - `check` - Test connection to the API
//! - `discover` - Emit the catalog
//! - `streams` - List stream names (lightweight)
//! - `read` - Extract data from streams

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
