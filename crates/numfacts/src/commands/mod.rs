//! Command implementations for the numfacts CLI.

pub mod fact;
pub mod history;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use numfacts_core::{App, Fact};
use tracing::debug;

use crate::config::Config;

/// Build the app for one command invocation.
pub(crate) fn build_app(config: &Config) -> Result<App> {
    debug!(
        backend = ?config.storage.backend,
        database = %config.storage.database_path.display(),
        "Building app"
    );
    App::build(config.to_core()).context("Failed to initialize numfacts")
}

/// One line per fact: `[key] text  (local time)`.
pub(crate) fn format_fact(fact: &Fact) -> String {
    format!(
        "{} {}  {}",
        format!("[{}]", fact.key).cyan().bold(),
        fact.text,
        fact.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    )
}
