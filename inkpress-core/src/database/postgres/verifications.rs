use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::ports::VerificationsRepository;
use crate::database::postgres::{map_db_err, rows::VerificationRow};
use crate::error::Result;
use inkpress_model::Verification;

/// PostgreSQL-backed implementation of the `VerificationsRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresVerificationsRepository {
    pool: PgPool,
}

impl PostgresVerificationsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationsRepository for PostgresVerificationsRepository {
    async fn insert_verification(&self, verification: &Verification) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO verifications (id, identifier, value, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(verification.id)
        .bind(&verification.identifier)
        .bind(&verification.value)
        .bind(verification.expires_at)
        .bind(verification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "insert verification"))?;

        Ok(())
    }

    async fn consume_verification(
        &self,
        identifier: &str,
        value: &str,
    ) -> Result<Option<Verification>> {
        // DELETE..RETURNING makes the single-use guarantee atomic: two
        // concurrent redeems can never both see the row.
        let row = sqlx::query_as::<_, VerificationRow>(
            r#"
            DELETE FROM verifications
            WHERE identifier = $1 AND value = $2
            RETURNING id, identifier, value, expires_at, created_at
            "#,
        )
        .bind(identifier)
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "consume verification"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let verification = Verification::from(row);
        if verification.is_expired(Utc::now()) {
            return Ok(None);
        }
        Ok(Some(verification))
    }
}
