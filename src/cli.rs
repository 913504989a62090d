//! Command-line interface for spellbench
//!
//! Three workflows: a balance report over a spell file, a single seeded duel
//! with its full log, and a Monte Carlo batch over a matchup config.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Spell balancing and combat simulation workbench
#[derive(Parser, Debug)]
#[command(name = "spellbench")]
#[command(about = "Spell balancing and combat simulation workbench")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute power, recommended cost and tier for every spell in a file
    Report {
        /// JSON file containing an array of spell records
        spells: PathBuf,

        /// Balance config file (RON); defaults to the bundled config
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,

        /// Write the report as JSON instead of printing a table
        #[arg(long, value_name = "OUTPUT_PATH")]
        output: Option<PathBuf>,
    },

    /// Run a single encounter and print the combat log
    Duel {
        /// JSON matchup config (same shape as `batch`, iterations ignored)
        config: PathBuf,

        /// Random seed for a reproducible encounter
        #[arg(long)]
        seed: Option<u64>,

        /// Output path for the saved combat log (optional)
        #[arg(long, value_name = "OUTPUT_PATH")]
        output: Option<PathBuf>,
    },

    /// Run a matchup many times and aggregate win rates and statistics
    Batch {
        /// JSON matchup config file
        config: PathBuf,

        /// Override the config's iteration count
        #[arg(long)]
        iterations: Option<u32>,

        /// Override the config's random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output path for the aggregate result JSON (optional)
        #[arg(long, value_name = "OUTPUT_PATH")]
        output: Option<PathBuf>,
    },
}

pub fn parse_args() -> Args {
    Args::parse()
}
