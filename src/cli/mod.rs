//! CLI module for salesdw
//!
//! Provides command-line interface for:
//! - init: Create the data directory and table schemas
//! - load: Run the loader over the configured sources
//! - query: Run one or all analytical queries
//! - check: Verify stored checksums and referential integrity
//! - summary: Row counts, revenue total and date range

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, init, load, query, run, run_command, summary};
pub use config::{Config, SourceFiles};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
