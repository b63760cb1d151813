use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::ports::SessionsRepository;
use crate::database::postgres::{map_db_err, rows::SessionRow};
use crate::error::Result;
use inkpress_model::Session;

/// PostgreSQL-backed implementation of the `SessionsRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresSessionsRepository {
    pool: PgPool,
}

impl PostgresSessionsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionsRepository for PostgresSessionsRepository {
    async fn insert_session(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, token, expires_at, ip_address, user_agent,
                user_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.id)
        .bind(&session.token)
        .bind(session.expires_at)
        .bind(&session.ip_address)
        .bind(&session.user_agent)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "insert session"))?;

        Ok(())
    }

    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, token, expires_at, ip_address, user_agent,
                   user_id, created_at, updated_at
            FROM sessions
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "get session by token"))?;

        Ok(row.map(Session::from))
    }

    async fn update_session_expiry(&self, session: &Session) -> Result<()> {
        // Zero rows affected means the session was deleted underneath us;
        // the refresh is best-effort.
        sqlx::query(
            "UPDATE sessions SET expires_at = $2, updated_at = $3 WHERE token = $1",
        )
        .bind(&session.token)
        .bind(session.expires_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "update session expiry"))?;

        Ok(())
    }

    async fn delete_session_by_token(&self, token: &str) -> Result<()> {
        // Zero rows affected is fine: sign-out is idempotent.
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_err(e, "delete session"))?;

        Ok(())
    }

    async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_err(e, "delete sessions for user"))?;

        Ok(())
    }
}
