//! Bulk administrative mutations with per-target outcomes

use std::sync::Arc;

use chrono::Utc;
use futures::{StreamExt, stream};
use tracing::{info, warn};
use uuid::Uuid;

use crate::authz::policy::{AdminAction, authorize_admin_action};
use crate::database::ports::UsersRepository;
use crate::error::{IdentityError, Result};
use inkpress_model::{BulkAction, BulkOutcome, BulkReport, User, UserRole};

/// Applies one [`BulkAction`] across many targets concurrently.
///
/// Every target is attempted; a failing target never aborts the batch, it
/// just records its own outcome. Each target mutation is a single
/// repository call, so a target is either fully applied or untouched.
#[derive(Clone)]
pub struct BulkAdminOperator {
    users: Arc<dyn UsersRepository>,
    concurrency: usize,
}

impl std::fmt::Debug for BulkAdminOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkAdminOperator")
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl BulkAdminOperator {
    /// Cap on simultaneously in-flight target mutations.
    pub const DEFAULT_CONCURRENCY: usize = 8;

    pub fn new(users: Arc<dyn UsersRepository>) -> Self {
        Self::with_concurrency(users, Self::DEFAULT_CONCURRENCY)
    }

    pub fn with_concurrency(users: Arc<dyn UsersRepository>, concurrency: usize) -> Self {
        Self {
            users,
            concurrency: concurrency.max(1),
        }
    }

    /// Apply `action` to every id in `targets` on behalf of `actor`.
    ///
    /// The actor must hold the admin role and not be banned; otherwise the
    /// whole request is rejected before any target is touched. Within an
    /// authorized batch, the actor's own id always resolves to
    /// [`BulkOutcome::Forbidden`]. Duplicate target ids collapse to one
    /// outcome.
    pub async fn apply(
        &self,
        actor: &User,
        action: &BulkAction,
        targets: &[Uuid],
    ) -> Result<BulkReport> {
        let now = Utc::now();
        authorize_admin_action(actor, Self::action_class(action), None, now)?;

        let outcomes = stream::iter(targets.iter().copied())
            .map(|target| {
                let action = action.clone();
                async move {
                    let outcome = if target == actor.id {
                        BulkOutcome::Forbidden
                    } else {
                        self.apply_one(&action, target).await
                    };
                    (target, outcome)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut report = BulkReport::default();
        for (target, outcome) in outcomes {
            report.record(target, outcome);
        }
        info!(
            actor = %actor.id,
            applied = report.applied(),
            failed = report.failed(),
            "bulk admin operation finished"
        );
        Ok(report)
    }

    async fn apply_one(&self, action: &BulkAction, target: Uuid) -> BulkOutcome {
        let result = match action {
            BulkAction::Ban { reason, expires } => {
                self.users
                    .set_ban(target, true, reason.clone(), *expires)
                    .await
            }
            BulkAction::Unban => self.users.set_ban(target, false, None, None).await,
            BulkAction::MakeAdmin => self.users.set_role(target, UserRole::Admin).await,
            BulkAction::MakeUser => self.users.set_role(target, UserRole::Visitor).await,
        };

        match result {
            Ok(()) => BulkOutcome::Applied,
            Err(IdentityError::NotFound(_)) => BulkOutcome::NotFound,
            Err(IdentityError::Forbidden(_)) => BulkOutcome::Forbidden,
            Err(IdentityError::Constraint(_)) => BulkOutcome::ConstraintViolation,
            Err(err) => {
                warn!(target = %target, "bulk mutation failed: {err}");
                BulkOutcome::ConstraintViolation
            }
        }
    }

    fn action_class(action: &BulkAction) -> AdminAction {
        match action {
            BulkAction::Ban { .. } => AdminAction::Ban,
            BulkAction::Unban => AdminAction::Unban,
            BulkAction::MakeAdmin => AdminAction::SetRole(UserRole::Admin),
            BulkAction::MakeUser => AdminAction::SetRole(UserRole::Visitor),
        }
    }
}
