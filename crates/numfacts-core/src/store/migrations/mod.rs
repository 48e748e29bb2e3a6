//! Fact store database migrations
//!
//! SQL migrations are embedded as strings and executed when the store is opened.

use rusqlite::Connection;

use crate::error::StoreError;

/// Facts table SQL (001)
pub const FACTS_TABLE_SQL: &str = include_str!("001_facts.sql");

/// Run all fact store migrations
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(FACTS_TABLE_SQL)?;
    Ok(())
}
