use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::ports::UsersRepository;
use crate::database::postgres::{map_db_err, rows::UserRow};
use crate::error::{IdentityError, Result};
use inkpress_model::{Account, User, UserRole};

/// PostgreSQL-backed implementation of the `UsersRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresUsersRepository {
    pool: PgPool,
}

impl PostgresUsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER: &str = r#"
    SELECT id, email, email_verified, name, image, role,
           banned, ban_reason, ban_expires, created_at, updated_at
    FROM users
"#;

#[async_trait]
impl UsersRepository for PostgresUsersRepository {
    async fn create_user_with_account(
        &self,
        user: &User,
        account: &Account,
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| IdentityError::Internal(format!("begin transaction: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, email_verified, name, image, role,
                banned, ban_reason, ban_expires, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.email_verified)
        .bind(&user.name)
        .bind(&user.image)
        .bind(user.role.as_str())
        .bind(user.banned)
        .bind(&user.ban_reason)
        .bind(user.ban_expires)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_err(e, "insert user"))?;

        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, account_id, provider_id, user_id,
                access_token, refresh_token, id_token,
                access_token_expires_at, refresh_token_expires_at,
                scope, password_hash, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(account.id)
        .bind(&account.account_id)
        .bind(&account.provider_id)
        .bind(account.user_id)
        .bind(&account.access_token)
        .bind(&account.refresh_token)
        .bind(&account.id_token)
        .bind(account.access_token_expires_at)
        .bind(account.refresh_token_expires_at)
        .bind(&account.scope)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_err(e, "insert account"))?;

        tx.commit()
            .await
            .map_err(|e| IdentityError::Internal(format!("commit transaction: {e}")))?;

        info!("Created user: {} ({})", user.email, user.id);
        Ok(())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            &format!("{SELECT_USER} WHERE id = $1"),
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "get user by id"))?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            &format!("{SELECT_USER} WHERE email = $1"),
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "get user by email"))?;

        Ok(row.map(User::from))
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            &format!("{SELECT_USER} ORDER BY created_at DESC"),
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "get all users"))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn set_ban(
        &self,
        user_id: Uuid,
        banned: bool,
        reason: Option<String>,
        expires: Option<DateTime<Utc>>,
    ) -> Result<()> {
        // Reason and expiry are only meaningful while banned; clearing the
        // ban clears them in the same atomic statement.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET banned = $2,
                ban_reason = CASE WHEN $2 THEN $3 ELSE NULL END,
                ban_expires = CASE WHEN $2 THEN $4 ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(banned)
        .bind(reason)
        .bind(expires)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "set ban"))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    async fn set_role(&self, user_id: Uuid, role: UserRole) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "set role"))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    async fn set_email_verified(&self, user_id: Uuid, verified: bool) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET email_verified = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(verified)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "set email verified"))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        // Sessions and accounts cascade via the schema's foreign keys.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_err(e, "delete user"))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(format!("user {user_id}")));
        }
        info!("Deleted user {user_id}");
        Ok(())
    }
}
