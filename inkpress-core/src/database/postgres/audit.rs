use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::ports::AuditLogRepository;
use crate::database::postgres::{map_db_err, rows::AuditRow};
use crate::error::Result;
use inkpress_model::{AuditKind, AuditLogEntry, NewAuditLogEntry};

/// PostgreSQL-backed implementation of the `AuditLogRepository` port.
///
/// Login and signup events land in separate append-only tables matching the
/// durable schema; the kind selects the table. No UPDATE or DELETE is ever
/// issued against either.
#[derive(Clone, Debug)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn table_for(kind: AuditKind) -> &'static str {
    match kind {
        AuditKind::Login => "user_login_logs",
        AuditKind::Signup => "user_signup_logs",
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn append(&self, entry: &NewAuditLogEntry) -> Result<AuditLogEntry> {
        let query = format!(
            r#"
            INSERT INTO {} (ip_address, user_agent, user_id, token, user_email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at, ip_address, user_agent, user_id, token, user_email
            "#,
            table_for(entry.kind)
        );

        let row = sqlx::query_as::<_, AuditRow>(&query)
            .bind(&entry.ip_address)
            .bind(&entry.user_agent)
            .bind(entry.user_id)
            .bind(&entry.token)
            .bind(&entry.user_email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_err(e, "append audit log"))?;

        Ok(AuditLogEntry::from(row))
    }

    async fn recent(&self, kind: AuditKind, limit: i64) -> Result<Vec<AuditLogEntry>> {
        let query = format!(
            r#"
            SELECT id, created_at, ip_address, user_agent, user_id, token, user_email
            FROM {}
            ORDER BY id DESC
            LIMIT $1
            "#,
            table_for(kind)
        );

        let rows = sqlx::query_as::<_, AuditRow>(&query)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_err(e, "list audit log"))?;

        Ok(rows.into_iter().map(AuditLogEntry::from).collect())
    }
}
