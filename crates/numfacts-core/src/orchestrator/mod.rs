//! Fetch orchestration.
//!
//! The orchestrator drives one flow:
//!
//! ```text
//! request ──▶ FactSource ──▶ FactStore.save ──▶ FactStore.recent ──▶ FactState
//! ```
//!
//! ## Single-flight
//!
//! ```text
//!        get_fact / get_random_fact
//!   Idle ──────────────────────────▶ Loading ──┬─ Ok  ──▶ Idle (current_fact, history updated)
//!    ▲                                 │       └─ Err ──▶ Idle (error_message set)
//!    │                                 │
//!    └──── requests while Loading are dropped, never queued
//! ```
//!
//! The loading guard is checked and set inside the watch channel's lock,
//! together with clearing `error_message`, so every observer sees each
//! transition as a single step.

mod state;

pub use state::{FactState, Phase};

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::source::FactSource;
use crate::store::FactStore;
use crate::types::Fact;

/// Result of a fetch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The source produced a fact; state now reflects it.
    Fetched(Fact),
    /// The source failed; carries the user-facing message now in state.
    Failed(String),
    /// Another fetch was in flight; nothing happened.
    Dropped,
}

/// Coordinates source, store and observable state.
pub struct FetchOrchestrator {
    source: Arc<dyn FactSource>,
    store: Arc<dyn FactStore>,
    history_limit: usize,
    state: watch::Sender<FactState>,
}

impl FetchOrchestrator {
    pub fn new(
        source: Arc<dyn FactSource>,
        store: Arc<dyn FactStore>,
        history_limit: usize,
    ) -> Self {
        let (state, _) = watch::channel(FactState::default());
        Self {
            source,
            store,
            history_limit,
            state,
        }
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<FactState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> FactState {
        self.state.borrow().clone()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Load history from the store. Leaves loading and error state alone.
    pub async fn on_appear(&self) {
        let history = self.store.recent(self.history_limit).await;
        debug!(count = history.len(), "Loaded history");
        self.state.send_modify(|s| s.history = history);
    }

    /// Fetch a fact about `key`.
    pub async fn get_fact(&self, key: i64) -> FetchOutcome {
        let Some(guard) = self.begin(Some(key)) else {
            debug!(key, "Fetch already in flight, dropping request");
            return FetchOutcome::Dropped;
        };
        let result = self.source.fact(key).await;
        self.finish(guard, result).await
    }

    /// Fetch a fact about a random number.
    pub async fn get_random_fact(&self) -> FetchOutcome {
        let Some(guard) = self.begin(None) else {
            debug!("Fetch already in flight, dropping random request");
            return FetchOutcome::Dropped;
        };
        let result = self.source.random_fact().await;
        self.finish(guard, result).await
    }

    /// Dismiss the current error, if any.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error_message.take().is_some());
    }

    /// Remove all stored facts and empty the published history.
    pub async fn clear_history(&self) {
        self.store.clear().await;
        self.state.send_modify(|s| s.history.clear());
        info!("Cleared fact history");
    }

    /// Enter Loading if idle. The returned guard owns the fetch.
    fn begin(&self, key: Option<i64>) -> Option<LoadingGuard<'_>> {
        let mut started = false;
        self.state.send_if_modified(|s| {
            let mut changed = false;
            if let Some(key) = key {
                changed = s.last_requested_key != Some(key);
                s.last_requested_key = Some(key);
            }
            if s.is_loading {
                return changed;
            }
            s.is_loading = true;
            s.error_message = None;
            started = true;
            true
        });
        started.then(|| LoadingGuard {
            state: &self.state,
            armed: true,
        })
    }

    async fn finish(
        &self,
        mut guard: LoadingGuard<'_>,
        result: Result<Fact, SourceError>,
    ) -> FetchOutcome {
        match result {
            Ok(fact) => {
                self.store.save(&fact).await;
                let history = self.store.recent(self.history_limit).await;
                info!(key = fact.key, "Fetched fact");

                let current = fact.clone();
                self.state.send_modify(move |s| {
                    s.current_fact = Some(current);
                    s.history = history;
                    s.error_message = None;
                    s.is_loading = false;
                });
                guard.disarm();
                FetchOutcome::Fetched(fact)
            }
            Err(e) => {
                warn!(error = %e, "Fact fetch failed");
                let message = e.user_message();

                let published = message.clone();
                self.state.send_modify(move |s| {
                    s.error_message = Some(published);
                    s.is_loading = false;
                });
                guard.disarm();
                FetchOutcome::Failed(message)
            }
        }
    }
}

/// Returns the orchestrator to Idle if a fetch is abandoned before it
/// publishes its result, e.g. when the caller's future is dropped.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<FactState>,
    armed: bool,
}

impl LoadingGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Fact fetch abandoned before completion");
            self.state.send_modify(|s| s.is_loading = false);
        }
    }
}
