//! Credential links between users and authentication providers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider id reserved for password credentials managed by this system.
pub const LOCAL_PROVIDER: &str = "credential";

/// A provider-specific credential or external-identity link owned by a user
///
/// Local password credentials use [`LOCAL_PROVIDER`] with the user id as
/// `account_id` and the argon2 hash in `password_hash`. Social links carry
/// the provider's tokens instead. The (provider_id, account_id) pair is
/// unique per provider; a user may hold several accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Identifier of this identity at the provider
    pub account_id: String,
    /// Which provider issued the identity (e.g. "google", "credential")
    pub provider_id: String,
    /// Owning user; must reference an existing user row
    pub user_id: Uuid,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub access_token_expires_at: Option<DateTime<Utc>>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
    /// Argon2 hash, only present on local credential accounts (never serialized)
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a local password-credential account for `user_id`.
    pub fn local(user_id: Uuid, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            account_id: user_id.to_string(),
            provider_id: LOCAL_PROVIDER.to_string(),
            user_id,
            access_token: None,
            refresh_token: None,
            id_token: None,
            access_token_expires_at: None,
            refresh_token_expires_at: None,
            scope: None,
            password_hash: Some(password_hash),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build an external-provider link for `user_id`.
    pub fn external(
        user_id: Uuid,
        provider_id: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            account_id: account_id.into(),
            provider_id: provider_id.into(),
            user_id,
            access_token: None,
            refresh_token: None,
            id_token: None,
            access_token_expires_at: None,
            refresh_token_expires_at: None,
            scope: None,
            password_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this account is a local password credential.
    pub fn is_local(&self) -> bool {
        self.provider_id == LOCAL_PROVIDER
    }
}
