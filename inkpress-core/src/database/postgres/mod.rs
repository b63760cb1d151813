//! PostgreSQL-backed implementations of the repository ports
//!
//! Uniqueness and referential integrity live in the schema; violations are
//! translated from the named constraints into [`ConstraintViolation`]
//! variants here. Queries are built at runtime so the crate compiles without
//! a live database.

mod accounts;
mod audit;
mod rows;
mod sessions;
mod users;
mod verifications;

pub use accounts::PostgresAccountsRepository;
pub use audit::PostgresAuditLogRepository;
pub use sessions::PostgresSessionsRepository;
pub use users::PostgresUsersRepository;
pub use verifications::PostgresVerificationsRepository;

use crate::error::{ConstraintViolation, IdentityError};

/// Translate a sqlx error into the domain taxonomy using the constraint
/// names declared in the migrations.
pub(crate) fn map_db_err(err: sqlx::Error, context: &str) -> IdentityError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.constraint() {
            Some("users_email_key") => {
                return ConstraintViolation::DuplicateEmail.into();
            }
            Some("sessions_token_key") => {
                return ConstraintViolation::DuplicateToken.into();
            }
            Some("accounts_provider_account_key") => {
                return ConstraintViolation::DuplicateProviderAccount.into();
            }
            Some("sessions_user_id_fkey") | Some("accounts_user_id_fkey") => {
                return ConstraintViolation::DanglingReference.into();
            }
            _ => {}
        }
    }
    IdentityError::Internal(format!("{context}: {err}"))
}
