//! Cached top-spender standings.
//!
//! The aggregate query touches every completed purchase, so its result is
//! kept in a `moka` cache for a minute and dropped whenever a purchase is
//! recorded.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use frost_core::{LEADERBOARD_SIZE, LeaderboardEntry, standings};

use crate::db::{PurchaseStore, RepositoryError};

/// How long standings are served from cache.
pub const LEADERBOARD_TTL: Duration = Duration::from_secs(60);

const CACHE_KEY: &str = "top-spenders";

/// Leaderboard cache.
#[derive(Clone)]
pub struct LeaderboardCache {
    cache: Cache<&'static str, Arc<Vec<LeaderboardEntry>>>,
}

impl Default for LeaderboardCache {
    fn default() -> Self {
        Self::new(LEADERBOARD_TTL)
    }
}

impl LeaderboardCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { cache }
    }

    /// Current standings, loading them from `purchases` on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the aggregate query fails. Failures are
    /// not cached.
    pub async fn standings(
        &self,
        purchases: &dyn PurchaseStore,
    ) -> Result<Arc<Vec<LeaderboardEntry>>, RepositoryError> {
        if let Some(entries) = self.cache.get(CACHE_KEY).await {
            debug!("Cache hit for leaderboard");
            return Ok(entries);
        }

        let totals = purchases.top_spenders(LEADERBOARD_SIZE).await?;
        let entries = Arc::new(standings(totals));
        self.cache.insert(CACHE_KEY, Arc::clone(&entries)).await;
        Ok(entries)
    }

    /// Drop cached standings so the next read recomputes them.
    pub async fn invalidate(&self) {
        self.cache.invalidate(CACHE_KEY).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db::{MemoryStore, NewPurchase, UserStore};
    use crate::models::NewAccount;
    use frost_core::{Email, MinecraftUsername, OrderNumber, Price, PurchaseStatus, UserId};

    async fn spender(store: &MemoryStore, name: &str, cents: i64) -> UserId {
        let account = store
            .create(NewAccount {
                email: Email::parse(&format!("{name}@example.com")).unwrap(),
                password_hash: "hash".to_string(),
                minecraft_username: MinecraftUsername::parse(name).unwrap(),
            })
            .await
            .unwrap();
        store
            .record(NewPurchase {
                user_id: account.id,
                order_number: OrderNumber::from_millis(cents),
                items: Vec::new(),
                total: Price::from_cents(cents),
                status: PurchaseStatus::Completed,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        account.id
    }

    #[tokio::test]
    async fn test_cached_until_invalidated() {
        let store = MemoryStore::new();
        let cache = LeaderboardCache::default();
        spender(&store, "Steve", 999).await;

        let first = cache.standings(&store).await.unwrap();
        assert_eq!(first.len(), 1);

        spender(&store, "Alex", 4999).await;
        let cached = cache.standings(&store).await.unwrap();
        assert_eq!(cached.len(), 1);

        cache.invalidate().await;
        let fresh = cache.standings(&store).await.unwrap();
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].minecraft_username, "Alex");
        assert_eq!(fresh[0].rank, 1);
    }
}
