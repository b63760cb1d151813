//! Bulk administrative actions over the user roster

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An administrative action applied to each member of a selected user set
///
/// Wire tags match the admin UI's action names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BulkAction {
    /// Ban the target, optionally with a reason and an automatic expiry
    Ban {
        #[serde(default)]
        reason: Option<String>,
        #[serde(default)]
        expires: Option<DateTime<Utc>>,
    },
    /// Lift the target's ban
    Unban,
    /// Promote the target to administrator
    MakeAdmin,
    /// Demote the target to the default role
    MakeUser,
}

impl BulkAction {
    /// Short label for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ban { .. } => "ban",
            Self::Unban => "unban",
            Self::MakeAdmin => "makeAdmin",
            Self::MakeUser => "makeUser",
        }
    }
}

/// Per-target result of a bulk action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOutcome {
    /// The mutation was applied
    Applied,
    /// The policy denied the mutation for this target
    Forbidden,
    /// No user row with the target id exists
    NotFound,
    /// The mutation hit a persistence constraint
    ConstraintViolation,
}

impl BulkOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Aggregated per-target outcomes of one bulk request
///
/// Targets are reported independently: one target's failure never implies
/// anything about another's outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkReport {
    pub outcomes: BTreeMap<Uuid, BulkOutcome>,
}

impl BulkReport {
    pub fn record(&mut self, target: Uuid, outcome: BulkOutcome) {
        self.outcomes.insert(target, outcome);
    }

    pub fn applied(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_applied()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.applied()
    }
}
