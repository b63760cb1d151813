//! Opaque session token generation

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of generated session tokens.
pub const SESSION_TOKEN_LENGTH: usize = 64;

/// Generate a cryptographically secure session token
pub fn generate_session_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
