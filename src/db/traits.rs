// Audit sink trait — append-only store for processed comments.
//
// Shared by every worker, so implementations must accept concurrent
// appends. Each `record` call writes exactly one complete row.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{AuditEntry, AuditRecord};

#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one record and return its id.
    async fn record(&self, record: &AuditRecord) -> Result<i64>;

    /// Most recent records, newest first.
    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>>;

    /// Total number of records.
    async fn count(&self) -> Result<i64>;
}
