//! Identity and access core: session management, authorization policy,
//! audit logging, bulk admin operations, and the persistence ports that
//! back them.

pub mod admin;
pub mod auth;
pub mod authz;
pub mod database;
pub mod error;

pub use admin::BulkAdminOperator;
pub use auth::{
    AuditLogger, AuthContext, AuthCrypto, AuthResponse, SessionConfig,
    SessionManager, SignUpRequest, SocialProfile,
};
pub use authz::{AdminAction, authorize_admin_action, authorize_content_access};
pub use error::{ConstraintViolation, IdentityError, Result};
