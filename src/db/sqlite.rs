// SqliteAuditLog — rusqlite backend implementing the AuditSink trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Each append holds the lock for a single INSERT, so concurrent workers
// never interleave partial rows.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{AuditEntry, AuditRecord};
use super::traits::AuditSink;

pub struct SqliteAuditLog {
    conn: Mutex<Connection>,
}

impl SqliteAuditLog {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Count tables, for the `init` confirmation message.
    pub async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }
}

#[async_trait]
impl AuditSink for SqliteAuditLog {
    async fn record(&self, record: &AuditRecord) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::insert_audit_record(&conn, record)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>> {
        let conn = self.conn.lock().await;
        super::queries::get_recent_audit_records(&conn, limit)
    }

    async fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_audit_records(&conn)
    }
}
