//! Administrative authorization decisions
//!
//! Pure functions over in-memory state; callers resolve the actor from a
//! validated session before asking for a decision.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{IdentityError, Result};
use inkpress_model::{User, UserRole};

/// Privileged operations gated by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    /// Enumerate all user accounts.
    ListUsers,
    /// Assign a new role to the target.
    SetRole(UserRole),
    /// Ban the target.
    Ban,
    /// Lift an existing ban on the target.
    Unban,
}

impl AdminAction {
    pub fn describe(&self) -> &'static str {
        match self {
            AdminAction::ListUsers => "list users",
            AdminAction::SetRole(_) => "set role",
            AdminAction::Ban => "ban user",
            AdminAction::Unban => "unban user",
        }
    }
}

/// Decide whether `actor` may perform `action` against `target`.
///
/// Rules, in evaluation order:
/// 1. an actively banned actor may do nothing, regardless of role;
/// 2. only admins may perform administrative actions;
/// 3. no actor may target their own account.
///
/// A passing decision says nothing about whether the target exists; the
/// mutation layer reports that separately.
pub fn authorize_admin_action(
    actor: &User,
    action: AdminAction,
    target: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<()> {
    if actor.is_ban_active(now) {
        return Err(IdentityError::Forbidden(
            "account is banned".to_string(),
        ));
    }
    if !actor.role.can_manage_users() {
        return Err(IdentityError::Forbidden(format!(
            "{} requires the admin role",
            action.describe()
        )));
    }
    if target == Some(actor.id) {
        return Err(IdentityError::Forbidden(
            "administrators cannot target their own account".to_string(),
        ));
    }
    Ok(())
}

/// Decide whether `actor` may access content requiring `required` privilege.
///
/// Roles are ordered; a supervisor passes every writer gate. Banned actors
/// are denied everything.
pub fn authorize_content_access(
    actor: &User,
    required: UserRole,
    now: DateTime<Utc>,
) -> Result<()> {
    if actor.is_ban_active(now) {
        return Err(IdentityError::Forbidden(
            "account is banned".to_string(),
        ));
    }
    if !actor.role.has_privilege_of(required) {
        return Err(IdentityError::Forbidden(format!(
            "requires at least the {required} role"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::now_v7(),
            email: format!("{role}@x.com"),
            email_verified: true,
            name: role.to_string(),
            image: None,
            role,
            banned: false,
            ban_reason: None,
            ban_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_admins_manage_users() {
        let now = Utc::now();
        let target = Some(Uuid::now_v7());
        for role in [UserRole::Visitor, UserRole::Writer, UserRole::Supervisor] {
            let actor = user(role);
            assert!(matches!(
                authorize_admin_action(&actor, AdminAction::Ban, target, now),
                Err(IdentityError::Forbidden(_))
            ));
        }
        let admin = user(UserRole::Admin);
        assert!(authorize_admin_action(&admin, AdminAction::Ban, target, now).is_ok());
        assert!(authorize_admin_action(&admin, AdminAction::ListUsers, None, now).is_ok());
    }

    #[test]
    fn self_target_is_always_forbidden() {
        let admin = user(UserRole::Admin);
        let err = authorize_admin_action(
            &admin,
            AdminAction::SetRole(UserRole::Visitor),
            Some(admin.id),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, IdentityError::Forbidden(_)));
    }

    #[test]
    fn banned_admin_is_denied_everything() {
        let mut admin = user(UserRole::Admin);
        admin.banned = true;
        let now = Utc::now();
        assert!(authorize_admin_action(&admin, AdminAction::ListUsers, None, now).is_err());
        assert!(authorize_content_access(&admin, UserRole::Visitor, now).is_err());

        // An elapsed ban restores access without an explicit unban.
        admin.ban_expires = Some(now - Duration::minutes(1));
        assert!(authorize_admin_action(&admin, AdminAction::ListUsers, None, now).is_ok());
    }

    #[test]
    fn content_access_follows_role_ordering() {
        let now = Utc::now();
        let writer = user(UserRole::Writer);
        assert!(authorize_content_access(&writer, UserRole::Visitor, now).is_ok());
        assert!(authorize_content_access(&writer, UserRole::Writer, now).is_ok());
        assert!(matches!(
            authorize_content_access(&writer, UserRole::Supervisor, now),
            Err(IdentityError::Forbidden(_))
        ));

        let supervisor = user(UserRole::Supervisor);
        assert!(authorize_content_access(&supervisor, UserRole::Writer, now).is_ok());
    }
}
