//! Repository ports consumed by the domain services
//!
//! Implementations live in [`crate::database::postgres`] (production) and
//! [`crate::database::memory`] (tests, demos).

pub mod accounts;
pub mod audit;
pub mod sessions;
pub mod users;
pub mod verifications;

pub use accounts::AccountsRepository;
pub use audit::AuditLogRepository;
pub use sessions::SessionsRepository;
pub use users::UsersRepository;
pub use verifications::VerificationsRepository;
