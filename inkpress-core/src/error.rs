use thiserror::Error;

/// A write was rejected by a persistence constraint.
///
/// These are surfaced to the caller and never retried automatically; the
/// caller must resolve the conflict (e.g. prompt for a different email).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("email is already registered")]
    DuplicateEmail,

    #[error("session token already exists")]
    DuplicateToken,

    #[error("provider account is already linked")]
    DuplicateProviderAccount,

    #[error("referenced user does not exist")]
    DanglingReference,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("constraint violation: {0}")]
    Constraint(#[from] ConstraintViolation),

    /// No matching credential pair. Deliberately carries no detail about
    /// whether the email or the password was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is banned")]
    AccountBanned,

    /// Unknown token, expired session, or banned user; the sub-reason is
    /// never exposed to the caller.
    #[error("session is invalid")]
    SessionInvalid,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, IdentityError>;
