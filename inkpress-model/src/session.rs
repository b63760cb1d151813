//! Session records for authenticated users

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-issued proof of an authenticated identity
///
/// A session is bound to an opaque token and an expiry. Whether the session
/// grants access additionally depends on the referenced user's ban state,
/// which is checked at validation time, not stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    /// Opaque bearer token, unique across all sessions
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Owning user; must reference an existing user row
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for `user_id` valid for `duration`.
    pub fn new(
        user_id: Uuid,
        token: String,
        duration: Duration,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            token,
            expires_at: now + duration,
            ip_address,
            user_agent,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the session itself has expired (ignores the user's ban state).
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Extend the session's expiry, keeping the same token.
    pub fn extend(&mut self, duration: Duration) {
        let now = Utc::now();
        self.expires_at = now + duration;
        self.updated_at = now;
    }
}
