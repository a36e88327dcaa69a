// Data models — Rust structs that map to database rows.
//
// These are separate from the queries so the pipeline can build audit
// records without depending on rusqlite directly.

use serde::{Deserialize, Serialize};

/// Everything the bot knows about one processed comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// RFC 3339 timestamp, taken when the record is written.
    pub recorded_at: String,
    pub post_id: i64,
    pub comment_id: i64,
    pub comment_text: String,
    pub comment_author_id: i64,
    pub extracted_references: Vec<String>,
    /// The webhook body exactly as it was received.
    pub raw_payload: serde_json::Value,
    /// Set iff a reply was actually posted.
    pub reply_id: Option<i64>,
    /// Reply text that was posted, or that we tried to post.
    pub reply_text: Option<String>,
}

/// An audit record as read back, with its row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    #[serde(flatten)]
    pub record: AuditRecord,
}
