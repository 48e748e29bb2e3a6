//! History listing and clearing.

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use super::{build_app, format_fact};
use crate::config::Config;

pub async fn execute(limit: Option<usize>, config: &Config) -> Result<()> {
    let mut config = config.clone();
    if let Some(limit) = limit {
        config.history.history_limit = limit.max(1);
    }

    let app = build_app(&config)?;
    app.orchestrator().on_appear().await;
    let history = app.orchestrator().snapshot().history;

    if history.is_empty() {
        println!("{}", "No facts yet.".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!("Recent facts ({} of {})", history.len(), app.store().len().await)
            .cyan()
            .bold()
    );
    println!("{}", "─".repeat(50));
    for fact in &history {
        println!("  {}", format_fact(fact));
    }

    Ok(())
}

pub async fn clear(config: &Config) -> Result<()> {
    let app = build_app(config)?;
    let removed = app.store().len().await;
    app.orchestrator().clear_history().await;
    info!(removed, "History cleared");

    println!("{} Cleared {} fact(s)", "✓".green(), removed);
    Ok(())
}
