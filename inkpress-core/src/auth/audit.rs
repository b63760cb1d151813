//! Best-effort audit logging decoupled from the authentication path

use std::sync::Arc;

use tracing::warn;

use crate::database::ports::AuditLogRepository;
use inkpress_model::NewAuditLogEntry;

/// Appends login/signup audit rows without ever blocking or failing the
/// caller.
///
/// The write is spawned onto the runtime; a failed append is surfaced only
/// through `tracing` and never retried. At-most-once semantics are
/// acceptable because each call corresponds to exactly one successful
/// authentication event.
#[derive(Clone)]
pub struct AuditLogger {
    log: Arc<dyn AuditLogRepository>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger").finish()
    }
}

impl AuditLogger {
    pub fn new(log: Arc<dyn AuditLogRepository>) -> Self {
        Self { log }
    }

    /// Record one event. Returns immediately; the append happens on a
    /// spawned task.
    pub fn record(&self, entry: NewAuditLogEntry) {
        let log = self.log.clone();
        tokio::spawn(async move {
            if let Err(err) = log.append(&entry).await {
                warn!(
                    kind = entry.kind.as_str(),
                    user_id = %entry.user_id,
                    "audit write failed: {err}"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::database::MemoryStore;
    use crate::error::{IdentityError, Result};
    use inkpress_model::{AuditKind, AuditLogEntry};

    fn new_entry(user_id: Uuid) -> NewAuditLogEntry {
        NewAuditLogEntry {
            kind: AuditKind::Login,
            user_id,
            user_email: "ana@example.com".to_string(),
            token: "t".repeat(64),
            ip_address: Some("10.0.0.1".to_string()),
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn record_appends_asynchronously() {
        let store = MemoryStore::new();
        let logger = AuditLogger::new(Arc::new(store.clone()));

        logger.record(new_entry(Uuid::now_v7()));
        // Let the spawned append run.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let rows = crate::database::ports::AuditLogRepository::recent(
            &store,
            AuditKind::Login,
            10,
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    struct FailingLog;

    #[async_trait]
    impl AuditLogRepository for FailingLog {
        async fn append(&self, _entry: &NewAuditLogEntry) -> Result<AuditLogEntry> {
            Err(IdentityError::Internal("disk on fire".to_string()))
        }

        async fn recent(
            &self,
            _kind: AuditKind,
            _limit: i64,
        ) -> Result<Vec<AuditLogEntry>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn failed_append_does_not_reach_the_caller() {
        let logger = AuditLogger::new(Arc::new(FailingLog));
        // Must not panic or propagate.
        logger.record(new_entry(Uuid::now_v7()));
        tokio::task::yield_now().await;
    }
}
