// Database layer — SQLite audit log of every processed comment.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever GAMEBOT_DB_PATH points
// (defaults to ./gamebot.db).

pub mod models;
pub mod queries;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteAuditLog;
pub use traits::AuditSink;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// Open the audit log at `db_path`, creating the file and its tables when
/// missing. Used by `init` and `serve`.
pub fn open_audit_log(db_path: &str) -> Result<Arc<SqliteAuditLog>> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory for audit log: {db_path}")
            })?;
        }
    }
    Ok(Arc::new(SqliteAuditLog::new(connect(db_path)?)))
}

/// Open an audit log that must already exist. Used by the read-only
/// `audit` command so a typo in GAMEBOT_DB_PATH is not silently a new file.
pub fn open_existing_audit_log(db_path: &str) -> Result<SqliteAuditLog> {
    if !Path::new(db_path).exists() {
        anyhow::bail!("No audit log at {db_path}. Run `gamebot init` or `gamebot serve` first.");
    }
    Ok(SqliteAuditLog::new(connect(db_path)?))
}

/// In-memory audit store with tables created. Used by tests.
pub fn initialize_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
    schema::create_tables(&conn)?;
    Ok(conn)
}

fn connect(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open audit log at {db_path}"))?;

    // WAL lets `gamebot audit` read while the server is appending
    conn.pragma_update(None, "journal_mode", "WAL")?;
    schema::create_tables(&conn)?;
    Ok(conn)
}
