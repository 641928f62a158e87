//! In-process store.
//!
//! [`MemoryStore`] implements both [`UserStore`] and [`PurchaseStore`] with the
//! same contracts as the `PostgreSQL` repositories, so one instance can back
//! both halves of the application state. Used by the test suites and handy
//! for running the storefront without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use frost_core::{Email, Price, Purchase, PurchaseId, SpenderTotals, UserId, UserRole};

use super::{NewPurchase, PurchaseStore, RepositoryError, UserStore};
use crate::models::{Account, AccountChanges, NewAccount};

/// Accounts keyed by id plus purchases in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<BTreeMap<UserId, Account>>,
    purchases: RwLock<Vec<(UserId, Purchase)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Number of recorded purchases across all accounts.
    pub async fn purchase_count(&self) -> usize {
        self.purchases.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let next_id = accounts.keys().next_back().map_or(1, |id| id.as_i32() + 1);
        let now = Utc::now();
        let stored = Account {
            id: UserId::new(next_id),
            email: account.email,
            password_hash: account.password_hash,
            minecraft_username: account.minecraft_username,
            discord_tag: None,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| &a.email == email).cloned())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        changes: AccountChanges,
    ) -> Result<Account, RepositoryError> {
        let mut accounts = self.accounts.write().await;
        if let Some(email) = &changes.email
            && accounts.values().any(|a| a.id != id && &a.email == email)
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let account = accounts.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(username) = changes.minecraft_username {
            account.minecraft_username = username;
        }
        if let Some(tag) = changes.discord_tag {
            account.discord_tag = tag;
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn set_role(&self, email: &Email, role: UserRole) -> Result<bool, RepositoryError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts
            .values_mut()
            .find(|a| &a.email == email)
            .map(|account| {
                account.role = role;
                account.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl PurchaseStore for MemoryStore {
    async fn record(&self, purchase: NewPurchase) -> Result<Purchase, RepositoryError> {
        let mut purchases = self.purchases.write().await;
        let id = i32::try_from(purchases.len() + 1)
            .map_err(|_| RepositoryError::DataCorruption("purchase id overflow".to_owned()))?;
        let stored = Purchase {
            id: PurchaseId::new(id),
            date: purchase.created_at,
            items: purchase.items,
            total: purchase.total,
            status: purchase.status,
            order_number: purchase.order_number,
        };
        purchases.push((purchase.user_id, stored.clone()));
        Ok(stored)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Purchase>, RepositoryError> {
        let purchases = self.purchases.read().await;
        let mut mine: Vec<Purchase> = purchases
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, p)| p.clone())
            .collect();
        mine.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(mine)
    }

    async fn top_spenders(&self, limit: usize) -> Result<Vec<SpenderTotals>, RepositoryError> {
        let accounts = self.accounts.read().await;
        let purchases = self.purchases.read().await;

        let mut totals: BTreeMap<UserId, (Price, u32)> = BTreeMap::new();
        for (owner, purchase) in purchases.iter().filter(|(_, p)| p.is_completed()) {
            let entry = totals.entry(*owner).or_insert((Price::ZERO, 0));
            entry.0 = entry.0 + purchase.total;
            entry.1 = entry.1.saturating_add(1);
        }

        // Purchases whose account is gone drop out, as with the SQL join.
        let mut spenders: Vec<SpenderTotals> = totals
            .into_iter()
            .filter(|(_, (total, _))| *total > Price::ZERO)
            .filter_map(|(user_id, (total_spent, total_purchases))| {
                accounts.get(&user_id).map(|account| SpenderTotals {
                    user_id,
                    minecraft_username: account.minecraft_username.as_str().to_string(),
                    total_spent,
                    total_purchases,
                })
            })
            .collect();
        spenders.sort_by(|a, b| {
            b.total_spent
                .cmp(&a.total_spent)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        spenders.truncate(limit);
        Ok(spenders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use frost_core::{MinecraftUsername, OrderNumber, PurchaseStatus};

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_string(),
            minecraft_username: MinecraftUsername::parse("Notch").unwrap(),
        }
    }

    fn new_purchase(user: i32, cents: i64, status: PurchaseStatus) -> NewPurchase {
        NewPurchase {
            user_id: UserId::new(user),
            order_number: OrderNumber::from_millis(i64::from(user) * 1000 + cents),
            items: Vec::new(),
            total: Price::from_cents(cents),
            status,
            created_at: Utc::now(),
        }
    }

    async fn buy(store: &MemoryStore, user: i32, cents: i64, status: PurchaseStatus) -> Purchase {
        store
            .record(new_purchase(user, cents, status))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_without_insert() {
        let store = MemoryStore::new();
        store
            .create(new_account("notch@example.com"))
            .await
            .unwrap();
        let err = store
            .create(new_account("NOTCH@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_email() {
        let store = MemoryStore::new();
        store.create(new_account("a@example.com")).await.unwrap();
        let b = store.create(new_account("b@example.com")).await.unwrap();

        let err = store
            .update_profile(
                b.id,
                AccountChanges {
                    email: Some(Email::parse("a@example.com").unwrap()),
                    ..AccountChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_set_role() {
        let store = MemoryStore::new();
        let account = store.create(new_account("op@example.com")).await.unwrap();
        assert!(
            store
                .set_role(&account.email, UserRole::Admin)
                .await
                .unwrap()
        );
        let ghost = Email::parse("ghost@example.com").unwrap();
        assert!(!store.set_role(&ghost, UserRole::Admin).await.unwrap());
        let reloaded = store.get_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(reloaded.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_top_spenders_counts_completed_only() {
        let store = MemoryStore::new();
        for email in ["a@example.com", "b@example.com", "c@example.com"] {
            store.create(new_account(email)).await.unwrap();
        }
        buy(&store, 1, 999, PurchaseStatus::Completed).await;
        buy(&store, 1, 4999, PurchaseStatus::Failed).await;
        buy(&store, 2, 1999, PurchaseStatus::Completed).await;
        buy(&store, 3, 500, PurchaseStatus::Pending).await;

        let top = store.top_spenders(10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_id, UserId::new(2));
        assert_eq!(top[1].total_spent, Price::from_cents(999));
        assert_eq!(top[1].total_purchases, 1);
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let store = MemoryStore::new();
        let first = buy(&store, 1, 100, PurchaseStatus::Completed).await;
        let second = buy(&store, 1, 200, PurchaseStatus::Completed).await;
        buy(&store, 2, 300, PurchaseStatus::Completed).await;

        let mine = store.list_for_user(UserId::new(1)).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine[0].date >= mine[1].date);
        assert!(mine.iter().any(|p| p.id == first.id));
        assert!(mine.iter().any(|p| p.id == second.id));
    }
}
