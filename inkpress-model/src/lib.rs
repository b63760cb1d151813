//! Core identity data model definitions shared across Inkpress crates.
#![allow(missing_docs)]

pub mod account;
pub mod admin;
pub mod audit;
pub mod role;
pub mod session;
pub mod user;
pub mod verification;

// Intentionally curated re-exports for downstream consumers.
pub use account::{Account, LOCAL_PROVIDER};
pub use admin::{BulkAction, BulkOutcome, BulkReport};
pub use audit::{AuditKind, AuditLogEntry, NewAuditLogEntry};
pub use role::UserRole;
pub use session::Session;
pub use user::{User, UserSummary};
pub use verification::Verification;
