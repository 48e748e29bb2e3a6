//! numfacts - facts about numbers from the command line
//!
//! Fetches facts from the Numbers API and keeps a bounded local history.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing on stderr so stdout carries only command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("numfacts=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = config::Config::load(cli.config.as_deref())?;
    if cli.memory {
        config.storage.backend = numfacts_core::StorageBackend::Memory;
    }

    // Execute command
    match cli.command {
        Commands::Fact { number } => commands::fact::execute(number, &config).await,
        Commands::Random => commands::fact::random(&config).await,
        Commands::History { limit } => commands::history::execute(limit, &config).await,
        Commands::Clear => commands::history::clear(&config).await,
    }
}
