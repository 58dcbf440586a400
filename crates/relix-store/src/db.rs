//! Database connection management
//!
//! Opens SQLite connections and applies the pragmas every relix connection
//! runs with.

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (creating if needed) a SQLite database file
///
/// # Errors
/// * `Storage` - the file cannot be opened or configured
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(|e| from_rusqlite("open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Open a private in-memory database
///
/// # Errors
/// * `Storage` - the connection cannot be configured
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(|e| from_rusqlite("open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Enable foreign key enforcement and WAL journaling
///
/// In-memory databases report `memory` as their journal mode; that is
/// accepted.
///
/// # Errors
/// * `Storage` - a pragma failed
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| from_rusqlite("configure", e))?;

    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| from_rusqlite("configure", e))?;
    tracing::debug!(journal_mode = mode.as_str(), "connection configured");

    Ok(())
}
