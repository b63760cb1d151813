use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use inkpress_model::Session;

#[async_trait]
pub trait SessionsRepository: Send + Sync {
    /// Persist a new session. Fails with `DuplicateToken` if the token is
    /// already in use and `DanglingReference` if the user does not exist.
    async fn insert_session(&self, session: &Session) -> Result<()>;

    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>>;

    /// Persist a refreshed expiry for an existing session, matched by
    /// token. A session deleted in the meantime is a silent no-op.
    async fn update_session_expiry(&self, session: &Session) -> Result<()>;

    /// Delete the session matching `token`. Deleting an unknown token is a
    /// successful no-op (sign-out is idempotent).
    async fn delete_session_by_token(&self, token: &str) -> Result<()>;

    /// Invalidate every session belonging to `user_id`.
    async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<()>;
}
