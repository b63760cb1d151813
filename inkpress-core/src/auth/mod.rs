//! Authentication: session issuance, credential hashing, audit trail

pub mod audit;
pub mod crypto;
pub mod manager;
pub mod token;

pub use audit::AuditLogger;
pub use crypto::{AuthCrypto, AuthCryptoError};
pub use manager::{
    AuthContext, AuthResponse, SessionConfig, SessionManager, SignUpRequest,
    SocialProfile,
};
pub use token::generate_session_token;
