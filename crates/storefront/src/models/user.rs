//! Stored account types.
//!
//! These mirror the `storefront.user` table after validation. The player
//! facing profile is [`frost_core::User`], built from an [`Account`] plus its
//! purchase history.

use chrono::{DateTime, Utc};

use frost_core::{Email, MinecraftUsername, Purchase, User, UserId, UserRole};

/// A registered account (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub minecraft_username: MinecraftUsername,
    pub discord_tag: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build the profile shown to the player.
    ///
    /// Total spend is derived from the completed purchases in `history`.
    #[must_use]
    pub fn into_profile(self, history: Vec<Purchase>) -> User {
        let mut user = User::new_member(
            self.id,
            self.email,
            self.minecraft_username,
            self.created_at,
        );
        user.discord_tag = self.discord_tag;
        user.role = self.role;
        if self.role.is_admin() {
            user.current_rank = "Owner".to_string();
            user.perks = ["All Permissions", "Server Management", "Admin Commands"]
                .iter()
                .map(ToString::to_string)
                .collect();
        }
        user.set_purchase_history(history);
        user
    }
}

/// Fields needed to insert an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password_hash: String,
    pub minecraft_username: MinecraftUsername,
}

/// Profile changes persisted from the settings page.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub email: Option<Email>,
    pub minecraft_username: Option<MinecraftUsername>,
    pub discord_tag: Option<Option<String>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use frost_core::{
        Category, OrderNumber, Price, PurchaseId, PurchaseItem, PurchaseStatus,
    };

    fn account(role: UserRole) -> Account {
        Account {
            id: UserId::new(3),
            email: Email::parse("alex@example.com").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            minecraft_username: MinecraftUsername::parse("Alex").unwrap(),
            discord_tag: Some("alex#0420".to_string()),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn purchase(id: i32, cents: i64, status: PurchaseStatus) -> Purchase {
        Purchase {
            id: PurchaseId::new(id),
            date: Utc::now(),
            items: vec![PurchaseItem {
                title: "VIP Rank".to_string(),
                category: Category::Rank,
                price: Price::from_cents(cents),
                quantity: 1,
            }],
            total: Price::from_cents(cents),
            status,
            order_number: OrderNumber::from_millis(i64::from(id)),
        }
    }

    #[test]
    fn test_profile_counts_completed_spend_only() {
        let profile = account(UserRole::User).into_profile(vec![
            purchase(1, 999, PurchaseStatus::Completed),
            purchase(2, 4999, PurchaseStatus::Failed),
            purchase(3, 1999, PurchaseStatus::Completed),
        ]);
        assert_eq!(profile.total_spent, Price::from_cents(2998));
        assert_eq!(profile.purchase_history.len(), 3);
        assert_eq!(profile.current_rank, "Member");
        assert_eq!(profile.discord_tag.as_deref(), Some("alex#0420"));
    }

    #[test]
    fn test_admin_profile() {
        let profile = account(UserRole::Admin).into_profile(Vec::new());
        assert!(profile.is_admin());
        assert_eq!(profile.current_rank, "Owner");
        assert!(profile.perks.contains(&"Admin Commands".to_string()));
    }
}
