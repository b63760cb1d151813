use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use inkpress_model::{Account, User, UserRole};

// User roster and ban/role mutation repository
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Create a user together with its first credential account.
    ///
    /// The pair must be observed as a single atomic unit: either both rows
    /// exist afterwards or neither does. Fails with `DuplicateEmail` or
    /// `DuplicateProviderAccount` on conflicts.
    async fn create_user_with_account(
        &self,
        user: &User,
        account: &Account,
    ) -> Result<()>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_all_users(&self) -> Result<Vec<User>>;

    /// Set or clear the ban state of a single user atomically.
    ///
    /// `reason` and `expires` are persisted only when `banned` is true.
    /// Fails with `NotFound` if no such user exists.
    async fn set_ban(
        &self,
        user_id: Uuid,
        banned: bool,
        reason: Option<String>,
        expires: Option<DateTime<Utc>>,
    ) -> Result<()>;

    /// Set the role of a single user atomically. Fails with `NotFound` if no
    /// such user exists.
    async fn set_role(&self, user_id: Uuid, role: UserRole) -> Result<()>;

    async fn set_email_verified(&self, user_id: Uuid, verified: bool) -> Result<()>;

    /// Delete a user; sessions and accounts cascade.
    async fn delete_user(&self, user_id: Uuid) -> Result<()>;
}
