//! Session and credential management
//!
//! The [`SessionManager`] owns the authentication lifecycle: sign-up,
//! password and social sign-in, sign-out, and session validation. It talks
//! to the persistence layer exclusively through the repository ports and
//! emits audit rows through the fire-and-forget [`AuditLogger`].

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::audit::AuditLogger;
use crate::auth::crypto::AuthCrypto;
use crate::auth::token::generate_session_token;
use crate::database::ports::{
    AccountsRepository, SessionsRepository, UsersRepository,
    VerificationsRepository,
};
use crate::error::{ConstraintViolation, IdentityError, Result};
use inkpress_model::{
    Account, AuditKind, NewAuditLogEntry, Session, User, UserRole, UserSummary,
    Verification,
};

/// Request metadata carried alongside every authentication call
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Sign-up payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Profile data supplied by an external provider after a social handshake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialProfile {
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Successful authentication result: the opaque token plus a user summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Session issuance configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Lifetime of newly issued sessions
    pub session_duration: Duration,
    /// Lifetime of email verification tokens
    pub verification_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_duration: Duration::days(7),
            verification_ttl: Duration::hours(24),
        }
    }
}

/// Creates and validates sessions and linked credential accounts.
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UsersRepository>,
    sessions: Arc<dyn SessionsRepository>,
    accounts: Arc<dyn AccountsRepository>,
    verifications: Arc<dyn VerificationsRepository>,
    crypto: Arc<AuthCrypto>,
    audit: AuditLogger,
    config: SessionConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionManager {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        sessions: Arc<dyn SessionsRepository>,
        accounts: Arc<dyn AccountsRepository>,
        verifications: Arc<dyn VerificationsRepository>,
        crypto: Arc<AuthCrypto>,
        audit: AuditLogger,
        config: SessionConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            accounts,
            verifications,
            crypto,
            audit,
            config,
        }
    }

    /// Register a new local account.
    ///
    /// Creates the user, its password-credential account, and a first
    /// session. Fails with `DuplicateEmail` if the address is taken.
    pub async fn sign_up(
        &self,
        request: SignUpRequest,
        ctx: &AuthContext,
    ) -> Result<AuthResponse> {
        Self::validate_sign_up(&request)?;
        let email = normalize_email(&request.email);

        if self.users.get_user_by_email(&email).await?.is_some() {
            return Err(ConstraintViolation::DuplicateEmail.into());
        }

        let password_hash = self
            .crypto
            .hash_password(&request.password)
            .map_err(|err| IdentityError::Internal(err.to_string()))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email,
            email_verified: false,
            name: request.name.trim().to_string(),
            image: None,
            role: UserRole::default(),
            banned: false,
            ban_reason: None,
            ban_expires: None,
            created_at: now,
            updated_at: now,
        };
        let account = Account::local(user.id, password_hash);

        // User + account land atomically; a constraint race surfaces here
        // as the same DuplicateEmail the pre-check catches.
        self.users.create_user_with_account(&user, &account).await?;

        let session = self.open_session(&user, ctx).await?;
        self.record_audit(AuditKind::Signup, &user, &session, ctx);

        info!("New signup: {} ({})", user.email, user.id);
        Ok(AuthResponse {
            token: session.token,
            user: user.summary(),
        })
    }

    /// Authenticate with email and password.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        ctx: &AuthContext,
    ) -> Result<AuthResponse> {
        let email = normalize_email(email);

        // Unknown email and wrong password are indistinguishable to the
        // caller.
        let Some(user) = self.users.get_user_by_email(&email).await? else {
            return Err(IdentityError::InvalidCredentials);
        };
        let Some(account) = self.accounts.get_local_account(user.id).await? else {
            return Err(IdentityError::InvalidCredentials);
        };
        let Some(stored_hash) = account.password_hash.as_deref() else {
            return Err(IdentityError::InvalidCredentials);
        };
        let verified = self
            .crypto
            .verify_password(password, stored_hash)
            .map_err(|err| IdentityError::Internal(err.to_string()))?;
        if !verified {
            return Err(IdentityError::InvalidCredentials);
        }

        if user.is_ban_active(Utc::now()) {
            return Err(IdentityError::AccountBanned);
        }

        let session = self.open_session(&user, ctx).await?;
        self.record_audit(AuditKind::Login, &user, &session, ctx);

        Ok(AuthResponse {
            token: session.token,
            user: user.summary(),
        })
    }

    /// Authenticate via an external provider identity.
    ///
    /// Reuses the linked user when the (provider, external id) pair is
    /// known; otherwise creates user and link as one atomic unit.
    pub async fn sign_in_social(
        &self,
        provider: &str,
        external_id: &str,
        profile: SocialProfile,
        ctx: &AuthContext,
    ) -> Result<AuthResponse> {
        if let Some(account) = self
            .accounts
            .get_account_by_provider(provider, external_id)
            .await?
        {
            let Some(user) = self.users.get_user_by_id(account.user_id).await? else {
                // FK enforcement makes this unreachable short of corruption.
                return Err(IdentityError::Internal(format!(
                    "account {} references missing user {}",
                    account.id, account.user_id
                )));
            };
            if user.is_ban_active(Utc::now()) {
                return Err(IdentityError::AccountBanned);
            }

            let session = self.open_session(&user, ctx).await?;
            self.record_audit(AuditKind::Login, &user, &session, ctx);

            return Ok(AuthResponse {
                token: session.token,
                user: user.summary(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: normalize_email(&profile.email),
            email_verified: profile.email_verified,
            name: profile.name.trim().to_string(),
            image: profile.image,
            role: UserRole::default(),
            banned: false,
            ban_reason: None,
            ban_expires: None,
            created_at: now,
            updated_at: now,
        };
        let account = Account::external(user.id, provider, external_id);

        self.users.create_user_with_account(&user, &account).await?;

        let session = self.open_session(&user, ctx).await?;
        self.record_audit(AuditKind::Signup, &user, &session, ctx);

        info!(
            "New social signup via {}: {} ({})",
            provider, user.email, user.id
        );
        Ok(AuthResponse {
            token: session.token,
            user: user.summary(),
        })
    }

    /// Invalidate the session matching `token`. Idempotent: an unknown or
    /// already-removed token succeeds silently.
    pub async fn sign_out(&self, token: &str) -> Result<()> {
        self.sessions.delete_session_by_token(token).await
    }

    /// Resolve a token to its user.
    ///
    /// Succeeds only while the session is unexpired and the user is not
    /// currently banned. The failure carries no sub-reason: unknown token,
    /// expiry, and ban are indistinguishable to the caller. Sessions in
    /// the second half of their lifetime are refreshed on successful
    /// validation.
    pub async fn validate_session(&self, token: &str) -> Result<User> {
        let Some(session) = self.sessions.get_session_by_token(token).await? else {
            return Err(IdentityError::SessionInvalid);
        };

        let now = Utc::now();
        if session.is_expired(now) {
            // Expired rows are reaped on sight.
            self.sessions.delete_session_by_token(token).await?;
            return Err(IdentityError::SessionInvalid);
        }

        // Re-read the user row so a ban committed after session issuance is
        // always observed.
        let Some(user) = self.users.get_user_by_id(session.user_id).await? else {
            return Err(IdentityError::SessionInvalid);
        };
        if user.is_ban_active(now) {
            return Err(IdentityError::SessionInvalid);
        }

        // Sliding expiry: a session past the midpoint of its lifetime is
        // refreshed so active users are not signed out mid-use.
        if session.expires_at - now < self.config.session_duration / 2 {
            let mut session = session;
            session.extend(self.config.session_duration);
            self.sessions.update_session_expiry(&session).await?;
        }

        Ok(user)
    }

    /// Issue a single-use email verification token for an existing user.
    /// Delivery is the caller's concern.
    pub async fn request_email_verification(&self, email: &str) -> Result<Verification> {
        let email = normalize_email(email);
        if self.users.get_user_by_email(&email).await?.is_none() {
            return Err(IdentityError::NotFound(format!("user {email}")));
        }

        let verification = Verification::new(
            email,
            generate_session_token(),
            self.config.verification_ttl,
        );
        self.verifications.insert_verification(&verification).await?;
        Ok(verification)
    }

    /// Redeem a verification token and mark the address verified.
    pub async fn verify_email(&self, identifier: &str, value: &str) -> Result<()> {
        let redeemed = self
            .verifications
            .consume_verification(identifier, value)
            .await?;
        if redeemed.is_none() {
            return Err(IdentityError::Validation(
                "invalid or expired verification token".to_string(),
            ));
        }

        let Some(user) = self.users.get_user_by_email(identifier).await? else {
            return Err(IdentityError::NotFound(format!("user {identifier}")));
        };
        self.users.set_email_verified(user.id, true).await
    }

    async fn open_session(&self, user: &User, ctx: &AuthContext) -> Result<Session> {
        let session = Session::new(
            user.id,
            generate_session_token(),
            self.config.session_duration,
            ctx.ip_address.clone(),
            ctx.user_agent.clone(),
        );
        self.sessions.insert_session(&session).await?;
        Ok(session)
    }

    fn record_audit(
        &self,
        kind: AuditKind,
        user: &User,
        session: &Session,
        ctx: &AuthContext,
    ) {
        self.audit.record(NewAuditLogEntry {
            kind,
            user_id: user.id,
            user_email: user.email.clone(),
            token: session.token.clone(),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
        });
    }

    fn validate_sign_up(request: &SignUpRequest) -> Result<()> {
        if request.name.trim().is_empty() {
            return Err(IdentityError::Validation("name is required".to_string()));
        }
        let email = request.email.trim();
        let valid_shape = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_shape {
            return Err(IdentityError::Validation(
                "invalid email address".to_string(),
            ));
        }
        if request.password.chars().count() < 6 {
            return Err(IdentityError::Validation(
                "password must be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto::test_crypto;
    use crate::database::MemoryStore;
    use crate::database::ports::AuditLogRepository;
    use crate::error::ConstraintViolation;

    fn manager(store: &MemoryStore) -> SessionManager {
        let repo = Arc::new(store.clone());
        SessionManager::new(
            repo.clone(),
            repo.clone(),
            repo.clone(),
            repo.clone(),
            Arc::new(test_crypto()),
            AuditLogger::new(repo),
            SessionConfig::default(),
        )
    }

    fn ana() -> SignUpRequest {
        SignUpRequest {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    fn ctx() -> AuthContext {
        AuthContext {
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
        }
    }

    #[tokio::test]
    async fn sign_up_creates_visitor_and_session() {
        let store = MemoryStore::new();
        let mgr = manager(&store);

        let response = mgr.sign_up(ana(), &ctx()).await.unwrap();
        assert_eq!(response.user.role, UserRole::Visitor);
        assert_eq!(response.user.email, "ana@x.com");

        let user = mgr.validate_session(&response.token).await.unwrap();
        assert!(!user.banned);
    }

    #[tokio::test]
    async fn duplicate_sign_up_fails_with_duplicate_email() {
        let store = MemoryStore::new();
        let mgr = manager(&store);

        mgr.sign_up(ana(), &ctx()).await.unwrap();
        let err = mgr.sign_up(ana(), &ctx()).await.unwrap_err();
        assert!(matches!(
            err,
            IdentityError::Constraint(ConstraintViolation::DuplicateEmail)
        ));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn email_comparison_is_case_insensitive() {
        let store = MemoryStore::new();
        let mgr = manager(&store);

        mgr.sign_up(ana(), &ctx()).await.unwrap();
        let mut shouting = ana();
        shouting.email = "ANA@X.COM".to_string();
        let err = mgr.sign_up(shouting, &ctx()).await.unwrap_err();
        assert!(matches!(
            err,
            IdentityError::Constraint(ConstraintViolation::DuplicateEmail)
        ));
    }

    #[tokio::test]
    async fn sign_up_validation() {
        let store = MemoryStore::new();
        let mgr = manager(&store);

        let mut short = ana();
        short.password = "12345".to_string();
        assert!(matches!(
            mgr.sign_up(short, &ctx()).await.unwrap_err(),
            IdentityError::Validation(_)
        ));

        let mut nameless = ana();
        nameless.name = "  ".to_string();
        assert!(matches!(
            mgr.sign_up(nameless, &ctx()).await.unwrap_err(),
            IdentityError::Validation(_)
        ));

        let mut bad_email = ana();
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(
            mgr.sign_up(bad_email, &ctx()).await.unwrap_err(),
            IdentityError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn sign_in_round_trip() {
        let store = MemoryStore::new();
        let mgr = manager(&store);
        mgr.sign_up(ana(), &ctx()).await.unwrap();

        let response = mgr.sign_in("ana@x.com", "secret1", &ctx()).await.unwrap();
        let user = mgr.validate_session(&response.token).await.unwrap();
        assert_eq!(user.email, "ana@x.com");
    }

    #[tokio::test]
    async fn sign_in_rejects_bad_credentials_uniformly() {
        let store = MemoryStore::new();
        let mgr = manager(&store);
        mgr.sign_up(ana(), &ctx()).await.unwrap();

        let wrong_password = mgr
            .sign_in("ana@x.com", "wrong", &ctx())
            .await
            .unwrap_err();
        let unknown_email = mgr
            .sign_in("nobody@x.com", "secret1", &ctx())
            .await
            .unwrap_err();
        assert!(matches!(wrong_password, IdentityError::InvalidCredentials));
        assert!(matches!(unknown_email, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn banned_user_cannot_sign_in_until_ban_expires() {
        let store = MemoryStore::new();
        let mgr = manager(&store);
        let response = mgr.sign_up(ana(), &ctx()).await.unwrap();

        store
            .set_ban(response.user.id, true, Some("spam".to_string()), None)
            .await
            .unwrap();
        assert!(matches!(
            mgr.sign_in("ana@x.com", "secret1", &ctx()).await.unwrap_err(),
            IdentityError::AccountBanned
        ));

        // Elapsed ban expiry lifts the gate without an unban write.
        store
            .set_ban(
                response.user.id,
                true,
                Some("spam".to_string()),
                Some(Utc::now() - Duration::minutes(1)),
            )
            .await
            .unwrap();
        assert!(mgr.sign_in("ana@x.com", "secret1", &ctx()).await.is_ok());
    }

    #[tokio::test]
    async fn validate_session_fails_closed() {
        let store = MemoryStore::new();
        let mgr = manager(&store);
        let response = mgr.sign_up(ana(), &ctx()).await.unwrap();

        // Unknown token.
        assert!(matches!(
            mgr.validate_session("no-such-token").await.unwrap_err(),
            IdentityError::SessionInvalid
        ));

        // Ban committed after issuance invalidates the live session.
        store
            .set_ban(response.user.id, true, None, None)
            .await
            .unwrap();
        assert!(matches!(
            mgr.validate_session(&response.token).await.unwrap_err(),
            IdentityError::SessionInvalid
        ));
    }

    #[tokio::test]
    async fn expired_session_is_invalid_and_reaped() {
        let store = MemoryStore::new();
        let mgr = manager(&store);
        let response = mgr.sign_up(ana(), &ctx()).await.unwrap();

        // Force-expire the stored session.
        let mut session = store
            .get_session_by_token(&response.token)
            .await
            .unwrap()
            .unwrap();
        store.delete_session_by_token(&response.token).await.unwrap();
        session.expires_at = Utc::now() - Duration::hours(1);
        store.insert_session(&session).await.unwrap();

        assert!(matches!(
            mgr.validate_session(&response.token).await.unwrap_err(),
            IdentityError::SessionInvalid
        ));
        assert!(store
            .get_session_by_token(&response.token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn validation_refreshes_aging_sessions_only() {
        let store = MemoryStore::new();
        let mgr = manager(&store);
        let response = mgr.sign_up(ana(), &ctx()).await.unwrap();

        // Fresh session: expiry stays where issuance put it.
        let issued = store
            .get_session_by_token(&response.token)
            .await
            .unwrap()
            .unwrap();
        mgr.validate_session(&response.token).await.unwrap();
        let after = store
            .get_session_by_token(&response.token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.expires_at, issued.expires_at);

        // Age the session past the midpoint of its lifetime.
        let mut aged = after;
        store.delete_session_by_token(&response.token).await.unwrap();
        aged.expires_at = Utc::now() + Duration::hours(1);
        store.insert_session(&aged).await.unwrap();

        mgr.validate_session(&response.token).await.unwrap();
        let refreshed = store
            .get_session_by_token(&response.token)
            .await
            .unwrap()
            .unwrap();
        assert!(refreshed.expires_at > Utc::now() + Duration::days(6));
    }

    #[tokio::test]
    async fn sign_out_is_idempotent() {
        let store = MemoryStore::new();
        let mgr = manager(&store);
        let response = mgr.sign_up(ana(), &ctx()).await.unwrap();

        mgr.sign_out(&response.token).await.unwrap();
        // Second call is a no-op with the same observable state.
        mgr.sign_out(&response.token).await.unwrap();
        assert!(matches!(
            mgr.validate_session(&response.token).await.unwrap_err(),
            IdentityError::SessionInvalid
        ));
    }

    #[tokio::test]
    async fn social_sign_in_is_idempotent_on_provider_pair() {
        let store = MemoryStore::new();
        let mgr = manager(&store);

        let profile = SocialProfile {
            email: "ana@x.com".to_string(),
            name: "Ana".to_string(),
            image: Some("https://example.com/a.png".to_string()),
            email_verified: true,
        };

        let first = mgr
            .sign_in_social("google", "g-42", profile.clone(), &ctx())
            .await
            .unwrap();
        let second = mgr
            .sign_in_social("google", "g-42", profile, &ctx())
            .await
            .unwrap();

        assert_eq!(first.user.id, second.user.id);
        assert_eq!(store.user_count().await, 1);
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn audit_rows_follow_successful_events() {
        let store = MemoryStore::new();
        let mgr = manager(&store);

        mgr.sign_up(ana(), &ctx()).await.unwrap();
        mgr.sign_in("ana@x.com", "secret1", &ctx()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let signups = store.recent(AuditKind::Signup, 10).await.unwrap();
        let logins = store.recent(AuditKind::Login, 10).await.unwrap();
        assert_eq!(signups.len(), 1);
        assert_eq!(logins.len(), 1);
        assert_eq!(signups[0].user_email, "ana@x.com");
        assert_eq!(signups[0].ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn email_verification_flow() {
        let store = MemoryStore::new();
        let mgr = manager(&store);
        let response = mgr.sign_up(ana(), &ctx()).await.unwrap();

        let verification = mgr
            .request_email_verification("ana@x.com")
            .await
            .unwrap();
        mgr.verify_email(&verification.identifier, &verification.value)
            .await
            .unwrap();

        let user = store.get_user_by_id(response.user.id).await.unwrap().unwrap();
        assert!(user.email_verified);

        // Single use: the second redeem fails.
        assert!(matches!(
            mgr.verify_email(&verification.identifier, &verification.value)
                .await
                .unwrap_err(),
            IdentityError::Validation(_)
        ));
    }
}
