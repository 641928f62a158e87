//! Demo data seeding.
//!
//! Records a completed purchase for an existing account so the leaderboard
//! and dashboard have something to show in development.

use chrono::Utc;
use frost_core::{Category, Email, OrderNumber, Price, PurchaseItem, PurchaseStatus};
use frost_storefront::db::{NewPurchase, PgPurchaseStore, PgUserStore, PurchaseStore, UserStore};
use tracing::info;

use super::connect;

/// Record one completed purchase of `amount` dollars for `email`.
///
/// # Errors
///
/// Returns an error if the amount is not a positive number, the account
/// does not exist, or the insert fails.
pub async fn purchase(email: &str, amount: &str) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    let total: Price = amount.parse()?;
    if total <= Price::ZERO {
        return Err(format!("Amount must be positive: {amount}").into());
    }

    let pool = connect().await?;
    let users = PgUserStore::new(pool.clone());
    let account = users
        .get_by_email(&email)
        .await?
        .ok_or_else(|| format!("No account registered with email: {email}"))?;

    let now = Utc::now();
    let purchase = PgPurchaseStore::new(pool)
        .record(NewPurchase {
            user_id: account.id,
            order_number: OrderNumber::at(now),
            items: vec![PurchaseItem {
                title: "Seeded Purchase".to_string(),
                category: Category::Rank,
                price: total,
                quantity: 1,
            }],
            total,
            status: PurchaseStatus::Completed,
            created_at: now,
        })
        .await?;

    info!(
        purchase_id = %purchase.id,
        order_number = %purchase.order_number,
        "Seeded {} purchase for {}",
        purchase.total,
        account.minecraft_username.as_str()
    );
    Ok(())
}
