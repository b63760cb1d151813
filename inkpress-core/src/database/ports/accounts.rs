use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use inkpress_model::Account;

#[async_trait]
pub trait AccountsRepository: Send + Sync {
    /// Link an additional account to an existing user. Fails with
    /// `DuplicateProviderAccount` or `DanglingReference`.
    async fn insert_account(&self, account: &Account) -> Result<()>;

    /// Look up the account registered for (provider_id, account_id).
    async fn get_account_by_provider(
        &self,
        provider_id: &str,
        account_id: &str,
    ) -> Result<Option<Account>>;

    /// The user's local password-credential account, if one exists.
    async fn get_local_account(&self, user_id: Uuid) -> Result<Option<Account>>;

    /// Unlink an account by row id.
    async fn delete_account(&self, id: Uuid) -> Result<()>;
}
