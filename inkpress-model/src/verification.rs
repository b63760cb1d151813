//! Single-use verification tokens for email and passwordless flows

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single-use token record
///
/// `identifier` names what is being verified (typically an email address),
/// `value` is the secret presented back by the user. A verification is
/// consumed at most once and is invalid after `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub id: Uuid,
    pub identifier: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Verification {
    /// Issue a verification for `identifier` valid for `ttl`.
    pub fn new(
        identifier: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            identifier: identifier.into(),
            value: value.into(),
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Whether the token can no longer be redeemed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_window() {
        let v = Verification::new("ana@example.com", "123456", Duration::minutes(10));
        assert!(!v.is_expired(Utc::now()));
        assert!(v.is_expired(Utc::now() + Duration::minutes(11)));
    }
}
