//! SQLite-backed fact store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::DateTime;
use rusqlite::{params, Connection};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{effective_limit, migrations, FactStore};
use crate::error::StoreError;
use crate::types::Fact;

/// Durable fact store.
///
/// Thread-safe via internal Mutex. Every operation holds the lock for the
/// duration of one short statement batch, so saves, reads and clears never
/// interleave. Timestamps are stored as Unix milliseconds.
pub struct SqliteFactStore {
    conn: Mutex<Connection>,
    capacity: usize,
}

/// Raw row before id and timestamp decoding
type FactRow = (String, i64, String, i64);

impl SqliteFactStore {
    /// Open (or create) a store at a file path.
    pub fn open(path: &Path, capacity: usize) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        debug!(path = %path.display(), capacity, "Opened fact store");
        Self::from_connection(conn, capacity)
    }

    /// Open a private in-memory database. Contents vanish with the store.
    pub fn open_in_memory(capacity: usize) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, capacity)
    }

    /// Wrap an existing connection, running migrations first.
    pub fn from_connection(conn: Connection, capacity: usize) -> Result<Self, StoreError> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            capacity,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn capacity_i64(&self) -> i64 {
        i64::try_from(self.capacity).unwrap_or(i64::MAX)
    }

    /// Insert or touch a fact, then evict down to capacity.
    pub fn try_save(&self, fact: &Fact) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(touched_seq), 0) + 1 FROM facts",
            [],
            |row| row.get(0),
        )?;

        tx.execute(
            "INSERT INTO facts (id, key, text, created_at, touched_seq)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(key, text) DO UPDATE SET
                created_at = excluded.created_at,
                touched_seq = excluded.touched_seq
             ON CONFLICT(id) DO NOTHING",
            params![
                fact.id.to_string(),
                fact.key,
                fact.text,
                fact.created_at.timestamp_millis(),
                seq,
            ],
        )?;

        let count: i64 = tx.query_row("SELECT COUNT(*) FROM facts", [], |row| row.get(0))?;
        let excess = count - self.capacity_i64();
        if excess > 0 {
            let evicted = tx.execute(
                "DELETE FROM facts WHERE id IN (
                    SELECT id FROM facts
                    ORDER BY created_at ASC, touched_seq ASC
                    LIMIT ?1
                 )",
                params![excess],
            )?;
            debug!(evicted, "Evicted facts over capacity");
        }

        tx.commit()?;
        Ok(())
    }

    /// Most recent facts, newest first.
    pub fn try_recent(&self, limit: usize) -> Result<Vec<Fact>, StoreError> {
        let limit = i64::try_from(effective_limit(limit, self.capacity)).unwrap_or(i64::MAX);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, key, text, created_at
             FROM facts
             ORDER BY created_at DESC, touched_seq DESC
             LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<std::result::Result<Vec<FactRow>, _>>()?;

        rows.into_iter().map(Self::decode_row).collect()
    }

    /// Delete every fact.
    pub fn try_clear(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM facts", [])?;
        debug!(removed, "Cleared fact store");
        Ok(())
    }

    /// Number of stored facts.
    pub fn try_len(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM facts", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn decode_row((id, key, text, created_at): FactRow) -> Result<Fact, StoreError> {
        let id = Uuid::parse_str(&id).map_err(|_| StoreError::InvalidId(id))?;
        let created_at = DateTime::from_timestamp_millis(created_at)
            .ok_or(StoreError::InvalidTimestamp(created_at))?;
        Ok(Fact {
            id,
            key,
            text,
            created_at,
        })
    }
}

#[async_trait]
impl FactStore for SqliteFactStore {
    async fn save(&self, fact: &Fact) {
        if let Err(e) = self.try_save(fact) {
            warn!(error = %e, key = fact.key, "Failed to save fact");
        }
    }

    async fn recent(&self, limit: usize) -> Vec<Fact> {
        self.try_recent(limit).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load recent facts");
            Vec::new()
        })
    }

    async fn clear(&self) {
        if let Err(e) = self.try_clear() {
            warn!(error = %e, "Failed to clear facts");
        }
    }

    async fn len(&self) -> usize {
        self.try_len().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to count facts");
            0
        })
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
