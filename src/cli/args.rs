//! CLI argument definitions using clap
//!
//! Commands:
//! - salesdw init --config <path> [--sample]
//! - salesdw load --config <path>
//! - salesdw query --config <path> [--name <query>]
//! - salesdw check --config <path>
//! - salesdw summary --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// salesdw - A star-schema sales warehouse with a fixed query library
#[derive(Parser, Debug)]
#[command(name = "salesdw")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a data directory and write the table schemas
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./salesdw.json")]
        config: PathBuf,

        /// Also write sample orders.csv and products.csv
        #[arg(long)]
        sample: bool,
    },

    /// Load the configured source files into a fresh warehouse
    Load {
        /// Path to configuration file
        #[arg(long, default_value = "./salesdw.json")]
        config: PathBuf,
    },

    /// Run one query, or every query when no name is given
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./salesdw.json")]
        config: PathBuf,

        /// Query name, e.g. product_performance
        #[arg(long)]
        name: Option<String>,
    },

    /// Verify stored checksums and report referential integrity
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./salesdw.json")]
        config: PathBuf,
    },

    /// Print row counts and revenue totals of the stored warehouse
    Summary {
        /// Path to configuration file
        #[arg(long, default_value = "./salesdw.json")]
        config: PathBuf,
    },
}

impl Command {
    /// Path of the configuration file for any command
    pub fn config_path(&self) -> &PathBuf {
        match self {
            Command::Init { config, .. }
            | Command::Load { config }
            | Command::Query { config, .. }
            | Command::Check { config }
            | Command::Summary { config } => config,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
