// Database schema — table creation.
//
// A `schema_version` table records which schema the file was created
// with, so later columns can be added as numbered migrations.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per processed webhook event. Append-only.
        CREATE TABLE IF NOT EXISTS audit_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recorded_at TEXT NOT NULL,         -- RFC 3339, UTC
            post_id INTEGER NOT NULL,
            comment_id INTEGER NOT NULL,
            comment_text TEXT NOT NULL,
            comment_author_id INTEGER NOT NULL,
            extracted_references TEXT NOT NULL, -- JSON array of strings
            raw_payload TEXT NOT NULL,         -- webhook body as received
            reply_id INTEGER,                  -- set only if a reply was posted
            reply_text TEXT                    -- attempted reply, even if posting failed
        );

        -- Index for looking up everything the bot saw under one post
        CREATE INDEX IF NOT EXISTS idx_audit_post
            ON audit_log(post_id);
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
