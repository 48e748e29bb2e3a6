//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Facts about numbers, with a local history
#[derive(Parser, Debug)]
#[command(name = "numfacts")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Keep history in memory for this run only
    #[arg(long, global = true)]
    pub memory: bool,

    /// Path to a config file (default: $NUMFACTS_CONFIG or the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a fact about a number
    Fact {
        /// The number to look up
        #[arg(allow_negative_numbers = true)]
        number: i64,
    },

    /// Fetch a fact about a random number
    Random,

    /// Show recently fetched facts, newest first
    History {
        /// Maximum number of facts to show (default: history.history_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete all stored facts
    Clear,
}
