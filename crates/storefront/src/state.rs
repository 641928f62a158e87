//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::admin_data::ProductBoard;
use crate::config::StorefrontConfig;
use crate::db::{PgPurchaseStore, PgUserStore, PurchaseStore, UserStore};
use crate::services::leaderboard::LeaderboardCache;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Stores sit behind traits so the same
/// router runs against Postgres in production and in-memory stores in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    users: Arc<dyn UserStore>,
    purchases: Arc<dyn PurchaseStore>,
    leaderboard: LeaderboardCache,
    products: ProductBoard,
}

impl AppState {
    /// Create application state over the given stores.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        users: Arc<dyn UserStore>,
        purchases: Arc<dyn PurchaseStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                purchases,
                leaderboard: LeaderboardCache::default(),
                products: ProductBoard::default(),
            }),
        }
    }

    /// Create application state backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(config: StorefrontConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgPurchaseStore::new(pool)),
        )
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    #[must_use]
    pub fn purchases(&self) -> &dyn PurchaseStore {
        self.inner.purchases.as_ref()
    }

    #[must_use]
    pub fn leaderboard(&self) -> &LeaderboardCache {
        &self.inner.leaderboard
    }

    /// Admin-managed product list (in process memory only).
    #[must_use]
    pub fn products(&self) -> &ProductBoard {
        &self.inner.products
    }
}
