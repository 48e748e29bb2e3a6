//! Bounded fact history.
//!
//! A `FactStore` keeps at most `capacity` facts, deduplicated by content
//! identity `(key, text)` and ordered by `created_at` descending.
//!
//! ## Save semantics
//!
//! ```text
//! save(fact)
//!   ├─ (key, text) already stored ──▶ move that entry's created_at to fact.created_at
//!   └─ otherwise                   ──▶ insert fact as a new entry
//!   then, while size > capacity    ──▶ evict the oldest entry
//! ```
//!
//! Equal timestamps are ordered by a monotonic touch counter so that the
//! most recently saved entry always sorts first.
//!
//! Two backends implement the same contract:
//!
//! - [`SqliteFactStore`]: durable, one table with a unique `(key, text)` index
//! - [`InMemoryFactStore`]: ephemeral, a single-owner worker task

mod memory;
#[cfg(feature = "db")]
pub mod migrations;
#[cfg(feature = "db")]
mod sqlite;

#[cfg(test)]
pub(crate) mod contract;

pub use memory::InMemoryFactStore;
#[cfg(feature = "db")]
pub use sqlite::SqliteFactStore;

use async_trait::async_trait;

use crate::types::Fact;

/// Default number of facts kept by a store.
pub const DEFAULT_CAPACITY: usize = 100;

/// Storage contract shared by every backend.
///
/// None of these operations report failure. Backends log persistence
/// errors and fall back to leaving state as it was (`save`, `clear`) or
/// returning nothing (`recent`, `len`).
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Insert a fact or touch the entry with the same content, then evict
    /// down to capacity.
    async fn save(&self, fact: &Fact);

    /// Most recent `min(max(limit, 1), capacity)` facts, newest first.
    async fn recent(&self, limit: usize) -> Vec<Fact>;

    /// Remove every entry.
    async fn clear(&self);

    /// Number of stored entries.
    async fn len(&self) -> usize;

    /// Maximum number of entries kept.
    fn capacity(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Effective row count for a `recent(limit)` call.
pub(crate) fn effective_limit(limit: usize, capacity: usize) -> usize {
    limit.max(1).min(capacity)
}
