//! Connection bootstrap for callers of `ParcelStore`
//!
//! The store only wraps a connection it is handed. These helpers open one
//! and make sure the `parcel` table exists.

use crate::config::TrackerConfig;
use crate::errors::{ParcelError, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Embedded schema SQL from PARCEL_SCHEMA.sql
const SCHEMA_SQL: &str = include_str!("../PARCEL_SCHEMA.sql");

/// Open the database named by the config and apply the schema
pub fn open(cfg: &TrackerConfig) -> Result<Connection> {
    open_at_path(&cfg.resolved_db_path(), cfg.busy_timeout())
}

/// Open a specific database path
///
/// Creates the database file and its parent directory if they don't exist.
pub fn open_at_path(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ParcelError::config_with_source(
                format!("failed to create db directory: {}", parent.display()),
                e,
            )
        })?;
    }

    let conn = Connection::open(path).map_err(|e| {
        ParcelError::storage(format!("failed to open db at {}", path.display()), e)
    })?;

    conn.busy_timeout(busy_timeout)
        .map_err(|e| ParcelError::storage("failed to set busy timeout", e))?;

    apply_schema(&conn)?;

    tracing::debug!(path = %path.display(), "Parcel DB initialized");

    Ok(conn)
}

/// Open an in-memory database with the schema applied
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|e| ParcelError::storage("failed to open in-memory db", e))?;

    apply_schema(&conn)?;

    Ok(conn)
}

/// Create the `parcel` table and its index if missing
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| ParcelError::storage("failed to apply schema", e))?;
    Ok(())
}
