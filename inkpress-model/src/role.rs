use serde::{Deserialize, Serialize};

/// User role enumeration for role-based access control
///
/// Defines the closed set of roles a user can hold in the CMS, ordered by
/// privilege. Roles are stored as lowercase strings in the database.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Reader with no authoring rights
    /// - Can browse published content
    /// - Can manage own profile
    #[default]
    Visitor,

    /// Content author
    /// - All Visitor capabilities
    /// - Can create and edit own posts
    Writer,

    /// Section supervisor
    /// - All Writer capabilities
    /// - Can moderate content in managed sections
    Supervisor,

    /// Administrator with full system access
    /// - All Supervisor capabilities
    /// - Can manage users, roles, and bans
    Admin,
}

impl UserRole {
    /// Check if this role has at least the privilege of `required`.
    pub fn has_privilege_of(&self, required: UserRole) -> bool {
        *self >= required
    }

    /// Check if this role may administer other users (role and ban changes).
    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Get all available roles in ascending privilege order
    pub fn all() -> &'static [UserRole] {
        &[
            UserRole::Visitor,
            UserRole::Writer,
            UserRole::Supervisor,
            UserRole::Admin,
        ]
    }

    /// Get the role name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Visitor => "visitor",
            UserRole::Writer => "writer",
            UserRole::Supervisor => "supervisor",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Visitor => write!(f, "Visitor"),
            UserRole::Writer => write!(f, "Writer"),
            UserRole::Supervisor => write!(f, "Supervisor"),
            UserRole::Admin => write!(f, "Administrator"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "visitor" => Ok(UserRole::Visitor),
            "writer" => Ok(UserRole::Writer),
            "supervisor" => Ok(UserRole::Supervisor),
            "admin" | "administrator" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privilege_ordering() {
        assert!(UserRole::Admin.has_privilege_of(UserRole::Visitor));
        assert!(UserRole::Admin.has_privilege_of(UserRole::Supervisor));
        assert!(UserRole::Admin.has_privilege_of(UserRole::Admin));

        assert!(UserRole::Supervisor.has_privilege_of(UserRole::Writer));
        assert!(!UserRole::Supervisor.has_privilege_of(UserRole::Admin));

        assert!(UserRole::Writer.has_privilege_of(UserRole::Visitor));
        assert!(!UserRole::Writer.has_privilege_of(UserRole::Supervisor));

        assert!(!UserRole::Visitor.has_privilege_of(UserRole::Writer));
    }

    #[test]
    fn role_capabilities() {
        assert!(UserRole::Admin.can_manage_users());
        assert!(!UserRole::Supervisor.can_manage_users());
        assert!(!UserRole::Writer.can_manage_users());
        assert!(!UserRole::Visitor.can_manage_users());
    }

    #[test]
    fn string_conversion() {
        assert_eq!(UserRole::Visitor.as_str(), "visitor");
        assert_eq!(UserRole::Writer.as_str(), "writer");
        assert_eq!(UserRole::Supervisor.as_str(), "supervisor");
        assert_eq!(UserRole::Admin.as_str(), "admin");

        assert_eq!("visitor".parse::<UserRole>().unwrap(), UserRole::Visitor);
        assert_eq!("writer".parse::<UserRole>().unwrap(), UserRole::Writer);
        assert_eq!(
            "supervisor".parse::<UserRole>().unwrap(),
            UserRole::Supervisor
        );
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(
            "administrator".parse::<UserRole>().unwrap(),
            UserRole::Admin
        );
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn default_is_lowest_privilege() {
        assert_eq!(UserRole::default(), UserRole::Visitor);
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&UserRole::Supervisor).unwrap();
        assert_eq!(json, "\"supervisor\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }
}
