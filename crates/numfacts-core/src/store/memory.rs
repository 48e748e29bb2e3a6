//! Ephemeral fact store.
//!
//! All state lives inside a single worker task. Callers talk to it through
//! a bounded command channel and get answers back on oneshot channels, so
//! store operations are applied strictly one at a time.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{effective_limit, FactStore};
use crate::error::StoreError;
use crate::types::Fact;

const COMMAND_BUFFER: usize = 64;

/// Sort key: newer timestamps and later touches sort higher.
type RecencyKey = (DateTime<Utc>, u64);

enum Command {
    Save {
        fact: Fact,
        reply: oneshot::Sender<()>,
    },
    Recent {
        limit: usize,
        reply: oneshot::Sender<Vec<Fact>>,
    },
    Clear {
        reply: oneshot::Sender<()>,
    },
    Len {
        reply: oneshot::Sender<usize>,
    },
}

/// In-memory fact store backed by a worker task.
///
/// Cloning yields another handle to the same worker. The worker exits once
/// every handle is dropped. Must be created inside a tokio runtime.
#[derive(Clone)]
pub struct InMemoryFactStore {
    tx: mpsc::Sender<Command>,
    capacity: usize,
}

impl InMemoryFactStore {
    /// Spawn the worker and return a handle to it.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(run_worker(Entries::new(capacity), rx));
        debug!(capacity, "Started in-memory fact store");
        Self { tx, capacity }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, StoreError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| StoreError::WorkerStopped)?;
        response.await.map_err(|_| StoreError::WorkerStopped)
    }

    pub async fn try_save(&self, fact: &Fact) -> Result<(), StoreError> {
        let fact = fact.clone();
        self.request(|reply| Command::Save { fact, reply }).await
    }

    pub async fn try_recent(&self, limit: usize) -> Result<Vec<Fact>, StoreError> {
        self.request(|reply| Command::Recent { limit, reply }).await
    }

    pub async fn try_clear(&self) -> Result<(), StoreError> {
        self.request(|reply| Command::Clear { reply }).await
    }

    pub async fn try_len(&self) -> Result<usize, StoreError> {
        self.request(|reply| Command::Len { reply }).await
    }
}

#[async_trait]
impl FactStore for InMemoryFactStore {
    async fn save(&self, fact: &Fact) {
        if let Err(e) = self.try_save(fact).await {
            warn!(error = %e, key = fact.key, "Failed to save fact");
        }
    }

    async fn recent(&self, limit: usize) -> Vec<Fact> {
        self.try_recent(limit).await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load recent facts");
            Vec::new()
        })
    }

    async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            warn!(error = %e, "Failed to clear facts");
        }
    }

    async fn len(&self) -> usize {
        self.try_len().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to count facts");
            0
        })
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

async fn run_worker(mut entries: Entries, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.recv().await {
        // A dropped reply receiver only means the caller went away.
        match command {
            Command::Save { fact, reply } => {
                entries.save(fact);
                let _ = reply.send(());
            }
            Command::Recent { limit, reply } => {
                let _ = reply.send(entries.recent(limit));
            }
            Command::Clear { reply } => {
                entries.clear();
                let _ = reply.send(());
            }
            Command::Len { reply } => {
                let _ = reply.send(entries.len());
            }
        }
    }
    debug!("In-memory fact store worker stopped");
}

/// Worker-owned state: facts ordered by recency plus a content index.
struct Entries {
    capacity: usize,
    next_seq: u64,
    by_recency: BTreeMap<RecencyKey, Fact>,
    by_content: HashMap<(i64, String), RecencyKey>,
    ids: HashSet<Uuid>,
}

impl Entries {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            next_seq: 0,
            by_recency: BTreeMap::new(),
            by_content: HashMap::new(),
            ids: HashSet::new(),
        }
    }

    fn save(&mut self, fact: Fact) {
        let content = fact.content_key();
        // An id already stored under other content is ignored, as in SQLite
        if !self.by_content.contains_key(&content) && self.ids.contains(&fact.id) {
            debug!(id = %fact.id, "Ignoring fact with a reused id");
            return;
        }

        self.next_seq += 1;
        let key = (fact.created_at, self.next_seq);

        let stored = match self
            .by_content
            .remove(&content)
            .and_then(|old| self.by_recency.remove(&old))
        {
            Some(existing) => Fact {
                created_at: fact.created_at,
                ..existing
            },
            None => fact,
        };

        self.ids.insert(stored.id);
        self.by_recency.insert(key, stored);
        self.by_content.insert(content, key);

        while self.by_recency.len() > self.capacity {
            if let Some((_, evicted)) = self.by_recency.pop_first() {
                self.by_content.remove(&evicted.content_key());
                self.ids.remove(&evicted.id);
                debug!(key = evicted.key, "Evicted fact");
            }
        }
    }

    fn recent(&self, limit: usize) -> Vec<Fact> {
        self.by_recency
            .values()
            .rev()
            .take(effective_limit(limit, self.capacity))
            .cloned()
            .collect()
    }

    fn clear(&mut self) {
        self.by_recency.clear();
        self.by_content.clear();
        self.ids.clear();
    }

    fn len(&self) -> usize {
        self.by_recency.len()
    }
}
