// Database queries — every SQL statement for the audit log lives here.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use super::models::{AuditEntry, AuditRecord};

/// Append one audit record and return its row id.
pub fn insert_audit_record(conn: &Connection, record: &AuditRecord) -> Result<i64> {
    let references = serde_json::to_string(&record.extracted_references)?;
    let payload = serde_json::to_string(&record.raw_payload)?;

    conn.execute(
        "INSERT INTO audit_log (
            recorded_at, post_id, comment_id, comment_text, comment_author_id,
            extracted_references, raw_payload, reply_id, reply_text
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.recorded_at,
            record.post_id,
            record.comment_id,
            record.comment_text,
            record.comment_author_id,
            references,
            payload,
            record.reply_id,
            record.reply_text,
        ],
    )
    .context("Failed to insert audit record")?;

    Ok(conn.last_insert_rowid())
}

/// Most recent audit records, newest first.
pub fn get_recent_audit_records(conn: &Connection, limit: u32) -> Result<Vec<AuditEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, recorded_at, post_id, comment_id, comment_text, comment_author_id,
                extracted_references, raw_payload, reply_id, reply_text
         FROM audit_log
         ORDER BY id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], row_to_raw)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?.decode()?);
    }
    Ok(entries)
}

/// Total number of audit records.
pub fn count_audit_records(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;
    Ok(count)
}

/// Row with its JSON columns still encoded. rusqlite's row mapper can only
/// return rusqlite errors, so JSON decoding happens afterwards.
struct RawAuditRow {
    id: i64,
    recorded_at: String,
    post_id: i64,
    comment_id: i64,
    comment_text: String,
    comment_author_id: i64,
    extracted_references: String,
    raw_payload: String,
    reply_id: Option<i64>,
    reply_text: Option<String>,
}

fn row_to_raw(row: &Row<'_>) -> rusqlite::Result<RawAuditRow> {
    Ok(RawAuditRow {
        id: row.get(0)?,
        recorded_at: row.get(1)?,
        post_id: row.get(2)?,
        comment_id: row.get(3)?,
        comment_text: row.get(4)?,
        comment_author_id: row.get(5)?,
        extracted_references: row.get(6)?,
        raw_payload: row.get(7)?,
        reply_id: row.get(8)?,
        reply_text: row.get(9)?,
    })
}

impl RawAuditRow {
    fn decode(self) -> Result<AuditEntry> {
        let extracted_references = serde_json::from_str(&self.extracted_references)
            .with_context(|| format!("Corrupt extracted_references in audit row {}", self.id))?;
        let raw_payload = serde_json::from_str(&self.raw_payload)
            .with_context(|| format!("Corrupt raw_payload in audit row {}", self.id))?;

        Ok(AuditEntry {
            id: self.id,
            record: AuditRecord {
                recorded_at: self.recorded_at,
                post_id: self.post_id,
                comment_id: self.comment_id,
                comment_text: self.comment_text,
                comment_author_id: self.comment_author_id,
                extracted_references,
                raw_payload,
                reply_id: self.reply_id,
                reply_text: self.reply_text,
            },
        })
    }
}
