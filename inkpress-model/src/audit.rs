//! Append-only audit log entries for security-relevant events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which audit stream an entry belongs to
///
/// Login and signup events are persisted to separate append-only tables; the
/// kind selects the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    Login,
    Signup,
}

impl AuditKind {
    /// Convert to the table-selecting string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }
}

/// A persisted audit row
///
/// Immutable once written; never updated or deleted by normal operation.
/// One entry corresponds to exactly one successful login or signup event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Monotonic row id assigned by the store
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub user_id: Uuid,
    /// Session token issued by the event being recorded
    pub token: String,
    pub user_email: String,
}

/// Payload for appending a new audit row (id and created_at are assigned by
/// the store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditLogEntry {
    pub kind: AuditKind,
    pub user_id: Uuid,
    pub user_email: String,
    pub token: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
