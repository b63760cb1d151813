use async_trait::async_trait;

use crate::error::Result;
use inkpress_model::{AuditKind, AuditLogEntry, NewAuditLogEntry};

// Append-only login/signup event log
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append one immutable row; the store assigns the monotonic id and
    /// timestamp. Rows are never updated or deleted afterwards.
    async fn append(&self, entry: &NewAuditLogEntry) -> Result<AuditLogEntry>;

    /// Most recent entries of one stream, newest first.
    async fn recent(&self, kind: AuditKind, limit: i64) -> Result<Vec<AuditLogEntry>>;
}
