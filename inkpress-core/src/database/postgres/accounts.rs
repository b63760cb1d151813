use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::ports::AccountsRepository;
use crate::database::postgres::{map_db_err, rows::AccountRow};
use crate::error::Result;
use inkpress_model::{Account, LOCAL_PROVIDER};

/// PostgreSQL-backed implementation of the `AccountsRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresAccountsRepository {
    pool: PgPool,
}

impl PostgresAccountsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT id, account_id, provider_id, user_id,
           access_token, refresh_token, id_token,
           access_token_expires_at, refresh_token_expires_at,
           scope, password_hash, created_at, updated_at
    FROM accounts
"#;

#[async_trait]
impl AccountsRepository for PostgresAccountsRepository {
    async fn insert_account(&self, account: &Account) -> Result<()> {
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
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "insert account"))?;

        Ok(())
    }

    async fn get_account_by_provider(
        &self,
        provider_id: &str,
        account_id: &str,
    ) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            &format!("{SELECT_ACCOUNT} WHERE provider_id = $1 AND account_id = $2"),
        )
        .bind(provider_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "get account by provider"))?;

        Ok(row.map(Account::from))
    }

    async fn get_local_account(&self, user_id: Uuid) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            &format!("{SELECT_ACCOUNT} WHERE user_id = $1 AND provider_id = $2"),
        )
        .bind(user_id)
        .bind(LOCAL_PROVIDER)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "get local account"))?;

        Ok(row.map(Account::from))
    }

    async fn delete_account(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_err(e, "delete account"))?;

        Ok(())
    }
}
