//! Persistence for the storefront.
//!
//! # Tables
//!
//! - `storefront.user` - Accounts (email, Argon2 hash, Minecraft username, role)
//! - `storefront.purchase` - Completed checkouts, summed for the leaderboard
//! - `tower_sessions.session` - Session records (created by the session store)
//!
//! Handlers never touch a pool directly. They go through the [`UserStore`]
//! and [`PurchaseStore`] traits, implemented for `PostgreSQL` ([`users`],
//! [`purchases`]) and in memory ([`memory`], used by tests and local demos).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p frost-cli -- migrate
//! ```

pub mod memory;
pub mod purchases;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use frost_core::{
    Email, OrderNumber, Price, Purchase, PurchaseItem, PurchaseStatus, SpenderTotals, UserId,
    UserRole,
};

use crate::models::{Account, AccountChanges, NewAccount};

pub use memory::MemoryStore;
pub use purchases::PgPurchaseStore;
pub use users::PgUserStore;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value failed domain validation.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError>;

    async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<Account>, RepositoryError>;

    /// Apply profile changes and return the updated account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist and
    /// `RepositoryError::Conflict` if the new email belongs to someone else.
    async fn update_profile(
        &self,
        id: UserId,
        changes: AccountChanges,
    ) -> Result<Account, RepositoryError>;

    /// Set an account's role. Returns `false` when no account has that email.
    async fn set_role(&self, email: &Email, role: UserRole) -> Result<bool, RepositoryError>;

    /// Connectivity check used by the readiness endpoint.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// A purchase about to be recorded.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub user_id: UserId,
    pub order_number: OrderNumber,
    pub items: Vec<PurchaseItem>,
    pub total: Price,
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
}

/// Purchase storage.
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn record(&self, purchase: NewPurchase) -> Result<Purchase, RepositoryError>;

    /// A user's purchases, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Purchase>, RepositoryError>;

    /// Completed spend per user, highest first, limited to `limit` users
    /// with a positive total.
    async fn top_spenders(&self, limit: usize) -> Result<Vec<SpenderTotals>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `Conflict`, everything else to `Database`.
pub(crate) fn conflict_on_unique(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}
