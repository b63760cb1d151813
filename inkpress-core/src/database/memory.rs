//! In-memory implementation of every repository port
//!
//! Backed by a single `RwLock`ed table set so cross-table invariants
//! (foreign keys, the user+account atomic unit) hold under concurrent use.
//! Data is lost on drop; intended for tests and demo setups.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::ports::{
    AccountsRepository, AuditLogRepository, SessionsRepository,
    UsersRepository, VerificationsRepository,
};
use crate::error::{ConstraintViolation, IdentityError, Result};
use inkpress_model::{
    Account, AuditKind, AuditLogEntry, NewAuditLogEntry, Session, User,
    UserRole, Verification,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Session>,
    accounts: Vec<Account>,
    verifications: Vec<Verification>,
    login_logs: Vec<AuditLogEntry>,
    signup_logs: Vec<AuditLogEntry>,
    next_log_id: i64,
}

impl Tables {
    fn check_account_insert(&self, account: &Account) -> Result<()> {
        if !self.users.contains_key(&account.user_id) {
            return Err(ConstraintViolation::DanglingReference.into());
        }
        let taken = self.accounts.iter().any(|existing| {
            existing.provider_id == account.provider_id
                && existing.account_id == account.account_id
        });
        if taken {
            return Err(ConstraintViolation::DuplicateProviderAccount.into());
        }
        Ok(())
    }

    fn append_log(&mut self, entry: &NewAuditLogEntry) -> AuditLogEntry {
        self.next_log_id += 1;
        let row = AuditLogEntry {
            id: self.next_log_id,
            created_at: Utc::now(),
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            user_id: entry.user_id,
            token: entry.token.clone(),
            user_email: entry.user_email.clone(),
        };
        match entry.kind {
            AuditKind::Login => self.login_logs.push(row.clone()),
            AuditKind::Signup => self.signup_logs.push(row.clone()),
        }
        row
    }
}

/// HashMap-backed store implementing all repository ports.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted users (for tests).
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    /// Number of persisted accounts (for tests).
    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }
}

#[async_trait]
impl UsersRepository for MemoryStore {
    async fn create_user_with_account(
        &self,
        user: &User,
        account: &Account,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;

        let email_taken = tables
            .users
            .values()
            .any(|existing| existing.email == user.email);
        if email_taken {
            return Err(ConstraintViolation::DuplicateEmail.into());
        }
        if account.user_id != user.id {
            return Err(ConstraintViolation::DanglingReference.into());
        }
        let provider_taken = tables.accounts.iter().any(|existing| {
            existing.provider_id == account.provider_id
                && existing.account_id == account.account_id
        });
        if provider_taken {
            return Err(ConstraintViolation::DuplicateProviderAccount.into());
        }

        // Both inserts happen under one write guard: the atomic unit.
        tables.users.insert(user.id, user.clone());
        tables.accounts.push(account.clone());
        Ok(())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn set_ban(
        &self,
        user_id: Uuid,
        banned: bool,
        reason: Option<String>,
        expires: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| IdentityError::NotFound(format!("user {user_id}")))?;
        user.banned = banned;
        user.ban_reason = if banned { reason } else { None };
        user.ban_expires = if banned { expires } else { None };
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_role(&self, user_id: Uuid, role: UserRole) -> Result<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| IdentityError::NotFound(format!("user {user_id}")))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_email_verified(&self, user_id: Uuid, verified: bool) -> Result<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| IdentityError::NotFound(format!("user {user_id}")))?;
        user.email_verified = verified;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&user_id).is_none() {
            return Err(IdentityError::NotFound(format!("user {user_id}")));
        }
        tables
            .sessions
            .retain(|_, session| session.user_id != user_id);
        tables.accounts.retain(|account| account.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl SessionsRepository for MemoryStore {
    async fn insert_session(&self, session: &Session) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&session.user_id) {
            return Err(ConstraintViolation::DanglingReference.into());
        }
        if tables.sessions.contains_key(&session.token) {
            return Err(ConstraintViolation::DuplicateToken.into());
        }
        tables
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(token).cloned())
    }

    async fn update_session_expiry(&self, session: &Session) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.sessions.get_mut(&session.token) {
            stored.expires_at = session.expires_at;
            stored.updated_at = session.updated_at;
        }
        Ok(())
    }

    async fn delete_session_by_token(&self, token: &str) -> Result<()> {
        self.tables.write().await.sessions.remove(token);
        Ok(())
    }

    async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<()> {
        self.tables
            .write()
            .await
            .sessions
            .retain(|_, session| session.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl AccountsRepository for MemoryStore {
    async fn insert_account(&self, account: &Account) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.check_account_insert(account)?;
        tables.accounts.push(account.clone());
        Ok(())
    }

    async fn get_account_by_provider(
        &self,
        provider_id: &str,
        account_id: &str,
    ) -> Result<Option<Account>> {
        Ok(self
            .tables
            .read()
            .await
            .accounts
            .iter()
            .find(|account| {
                account.provider_id == provider_id
                    && account.account_id == account_id
            })
            .cloned())
    }

    async fn get_local_account(&self, user_id: Uuid) -> Result<Option<Account>> {
        Ok(self
            .tables
            .read()
            .await
            .accounts
            .iter()
            .find(|account| account.user_id == user_id && account.is_local())
            .cloned())
    }

    async fn delete_account(&self, id: Uuid) -> Result<()> {
        self.tables
            .write()
            .await
            .accounts
            .retain(|account| account.id != id);
        Ok(())
    }
}

#[async_trait]
impl VerificationsRepository for MemoryStore {
    async fn insert_verification(&self, verification: &Verification) -> Result<()> {
        self.tables
            .write()
            .await
            .verifications
            .push(verification.clone());
        Ok(())
    }

    async fn consume_verification(
        &self,
        identifier: &str,
        value: &str,
    ) -> Result<Option<Verification>> {
        let mut tables = self.tables.write().await;
        let position = tables.verifications.iter().position(|v| {
            v.identifier == identifier && v.value == value
        });
        let Some(position) = position else {
            return Ok(None);
        };
        // Removed unconditionally: a token is consumed at most once.
        let verification = tables.verifications.remove(position);
        if verification.is_expired(Utc::now()) {
            return Ok(None);
        }
        Ok(Some(verification))
    }
}

#[async_trait]
impl AuditLogRepository for MemoryStore {
    async fn append(&self, entry: &NewAuditLogEntry) -> Result<AuditLogEntry> {
        Ok(self.tables.write().await.append_log(entry))
    }

    async fn recent(&self, kind: AuditKind, limit: i64) -> Result<Vec<AuditLogEntry>> {
        let tables = self.tables.read().await;
        let stream = match kind {
            AuditKind::Login => &tables.login_logs,
            AuditKind::Signup => &tables.signup_logs,
        };
        Ok(stream
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
