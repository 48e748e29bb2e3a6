//! Fetch a fact, for a given number or a random one.

use anyhow::{bail, Result};
use colored::Colorize;
use numfacts_core::{FetchOutcome, FetchOrchestrator};
use tracing::{info, warn};

use super::{build_app, format_fact};
use crate::config::Config;

pub async fn execute(number: i64, config: &Config) -> Result<()> {
    let app = build_app(config)?;
    info!(number, "Looking up fact");
    let outcome = app.orchestrator().get_fact(number).await;
    report(app.orchestrator(), outcome)
}

pub async fn random(config: &Config) -> Result<()> {
    let app = build_app(config)?;
    info!("Looking up random fact");
    let outcome = app.orchestrator().get_random_fact().await;
    report(app.orchestrator(), outcome)
}

fn report(orchestrator: &FetchOrchestrator, outcome: FetchOutcome) -> Result<()> {
    let state = orchestrator.snapshot();

    match (outcome, state.current_fact) {
        (FetchOutcome::Fetched(_), Some(fact)) => {
            println!("{}", format_fact(&fact));
            println!(
                "{}",
                format!("{} fact(s) in history", state.history.len()).dimmed()
            );
            Ok(())
        }
        (FetchOutcome::Failed(message), _) => {
            warn!(%message, "Lookup failed");
            bail!(message)
        }
        _ => bail!("No fact was fetched"),
    }
}
