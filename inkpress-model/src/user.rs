//! User accounts and roster summaries
//!
//! The [`User`] struct is the identity record every other entity hangs off
//! of. Ban state is stored inline (`banned`, `ban_reason`, `ban_expires`);
//! `ban_reason`/`ban_expires` carry meaning only while `banned` is true, and
//! an elapsed `ban_expires` means the ban is no longer in effect even though
//! the stored flag has not been cleared yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::UserRole;

/// Core user identity record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Globally unique email address
    pub email: String,
    /// Whether the email address has been verified
    pub email_verified: bool,
    /// Display name shown in the UI
    pub name: String,
    /// Optional URL to the user's avatar image
    pub image: Option<String>,
    /// Assigned role, defaults to the lowest privilege
    pub role: UserRole,
    /// Whether the user is banned
    pub banned: bool,
    /// Reason recorded when the ban was issued
    pub ban_reason: Option<String>,
    /// If set, the ban lifts automatically once this instant passes
    pub ban_expires: Option<DateTime<Utc>>,
    /// Timestamp of account creation (server-assigned)
    pub created_at: DateTime<Utc>,
    /// Timestamp of last record update (server-assigned)
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether a ban is in effect at `now`.
    ///
    /// A ban with an elapsed `ban_expires` no longer denies access even if
    /// the stored `banned` flag has not been cleared.
    pub fn is_ban_active(&self, now: DateTime<Utc>) -> bool {
        if !self.banned {
            return false;
        }
        match self.ban_expires {
            Some(expires) => now < expires,
            None => true,
        }
    }

    /// Reduce to the summary shape returned by authentication calls.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            role: self.role,
        }
    }
}

/// Compact user projection returned alongside session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::now_v7(),
            email: "ana@example.com".to_string(),
            email_verified: false,
            name: "Ana".to_string(),
            image: None,
            role: UserRole::default(),
            banned: false,
            ban_reason: None,
            ban_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unbanned_user_is_never_ban_active() {
        let mut user = sample_user();
        // Stale reason/expiry fields are ignored while banned=false.
        user.ban_reason = Some("old incident".to_string());
        user.ban_expires = Some(Utc::now() + Duration::days(1));
        assert!(!user.is_ban_active(Utc::now()));
    }

    #[test]
    fn indefinite_ban_stays_active() {
        let mut user = sample_user();
        user.banned = true;
        assert!(user.is_ban_active(Utc::now()));
    }

    #[test]
    fn ban_lifts_after_expiry() {
        let mut user = sample_user();
        user.banned = true;
        user.ban_expires = Some(Utc::now() - Duration::minutes(1));
        assert!(!user.is_ban_active(Utc::now()));

        user.ban_expires = Some(Utc::now() + Duration::minutes(1));
        assert!(user.is_ban_active(Utc::now()));
    }
}
