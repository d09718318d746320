//! Open the catalog store, ensure schema, and small queries.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use crate::utils::config::DB_BUSY_TIMEOUT_MS;

use super::{QUERY_INDEXES, SCHEMA, WAL_PRAGMAS};

/// Enable WAL and apply schema to an open connection (idempotent).
fn apply_wal_and_schema(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute_batch(WAL_PRAGMAS).context("set WAL pragmas")?;
    init_schema(conn)
}

/// Create `folders` and `files` if absent. Safe on an initialized store.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).context("create schema")
}

/// Open or create the store and ensure schema + WAL. Committed batches survive a kill.
pub fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("open database {}", path.display()))?;
    conn.busy_timeout(Duration::from_millis(DB_BUSY_TIMEOUT_MS))
        .context("set busy timeout")?;
    apply_wal_and_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory store with the same schema (no WAL).
pub fn open_db_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory database")?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Indexes by extension, folder, and mtime for later queries.
pub fn create_query_indexes(conn: &Connection) -> Result<()> {
    conn.execute_batch(QUERY_INDEXES)
        .context("create query indexes")
}

pub fn folder_count(conn: &Connection) -> Result<u64> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM folders", [], |row| row.get(0))
        .context("count folders")?;
    Ok(n.max(0) as u64)
}

pub fn file_count(conn: &Connection) -> Result<u64> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
        .context("count files")?;
    Ok(n.max(0) as u64)
}
