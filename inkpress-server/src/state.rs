//! Shared application state

use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use inkpress_core::database::MemoryStore;
use inkpress_core::database::ports::UsersRepository;
use inkpress_core::database::postgres::{
    PostgresAccountsRepository, PostgresAuditLogRepository,
    PostgresSessionsRepository, PostgresUsersRepository,
    PostgresVerificationsRepository,
};
use inkpress_core::{
    AuditLogger, AuthCrypto, BulkAdminOperator, SessionConfig, SessionManager,
};

/// Cloned into every handler; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub bulk: BulkAdminOperator,
    pub users: Arc<dyn UsersRepository>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}

impl AppState {
    /// Wire the state against PostgreSQL-backed repositories.
    pub fn from_postgres(
        pool: PgPool,
        crypto: AuthCrypto,
        session_days: i64,
    ) -> Self {
        let users: Arc<dyn UsersRepository> =
            Arc::new(PostgresUsersRepository::new(pool.clone()));
        let sessions = SessionManager::new(
            users.clone(),
            Arc::new(PostgresSessionsRepository::new(pool.clone())),
            Arc::new(PostgresAccountsRepository::new(pool.clone())),
            Arc::new(PostgresVerificationsRepository::new(pool.clone())),
            Arc::new(crypto),
            AuditLogger::new(Arc::new(PostgresAuditLogRepository::new(pool))),
            SessionConfig {
                session_duration: Duration::days(session_days),
                ..SessionConfig::default()
            },
        );
        Self {
            bulk: BulkAdminOperator::new(users.clone()),
            sessions,
            users,
        }
    }

    /// Wire the state against the in-memory store. Used by tests and local
    /// experimentation; nothing survives a restart.
    pub fn in_memory(store: MemoryStore, crypto: AuthCrypto) -> Self {
        let repo = Arc::new(store);
        let users: Arc<dyn UsersRepository> = repo.clone();
        let sessions = SessionManager::new(
            repo.clone(),
            repo.clone(),
            repo.clone(),
            repo.clone(),
            Arc::new(crypto),
            AuditLogger::new(repo),
            SessionConfig::default(),
        );
        Self {
            bulk: BulkAdminOperator::new(users.clone()),
            sessions,
            users,
        }
    }
}
