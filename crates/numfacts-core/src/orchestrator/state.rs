//! Observable orchestrator state.

use serde::Serialize;

use crate::types::Fact;

/// Snapshot of everything the orchestrator exposes to observers.
///
/// Observers receive clones through a watch channel; only the
/// orchestrator ever produces a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactState {
    /// Most recently fetched fact
    pub current_fact: Option<Fact>,
    /// Recent facts from the store, newest first
    pub history: Vec<Fact>,
    /// A fetch is in flight
    pub is_loading: bool,
    /// User-facing description of the last failed fetch
    pub error_message: Option<String>,
    /// Key of the last `get_fact` request, accepted or not
    pub last_requested_key: Option<i64>,
}

/// Coarse phase derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
}

impl FactState {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else {
            Phase::Idle
        }
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }
}
