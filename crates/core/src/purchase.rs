//! Purchases and order numbers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::{Category, Price, PurchaseId, PurchaseStatus};

/// Human-facing order reference, e.g. `MC-482913`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    const PREFIX: &'static str = "MC-";

    /// `MC-` followed by the last six digits of the Unix-millisecond
    /// timestamp of `at`.
    #[must_use]
    pub fn at(at: DateTime<Utc>) -> Self {
        Self::from_millis(at.timestamp_millis())
    }

    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{}{:06}", Self::PREFIX, millis.rem_euclid(1_000_000)))
    }

    /// Wrap an order number read back from storage.
    #[must_use]
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub title: String,
    pub category: Category,
    pub price: Price,
    pub quantity: u32,
}

impl PurchaseItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl From<&CartItem> for PurchaseItem {
    fn from(item: &CartItem) -> Self {
        Self {
            title: item.title.clone(),
            category: item.category,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// A recorded purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub date: DateTime<Utc>,
    pub items: Vec<PurchaseItem>,
    pub total: Price,
    pub status: PurchaseStatus,
    pub order_number: OrderNumber,
}

impl Purchase {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, PurchaseStatus::Completed)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |n, item| n.saturating_add(item.quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_order_number_uses_last_six_digits() {
        assert_eq!(
            OrderNumber::from_millis(1_718_000_482_913).as_str(),
            "MC-482913"
        );
        assert_eq!(
            OrderNumber::from_millis(1_718_000_000_042).as_str(),
            "MC-000042"
        );
    }

    #[test]
    fn test_order_number_at() {
        let at = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();
        assert_eq!(OrderNumber::at(at).to_string(), "MC-123456");
    }

    #[test]
    fn test_purchase_item_from_cart_item() {
        let cart_item = CartItem {
            id: "key-rare".into(),
            title: "Rare Crate Key".into(),
            price: Price::from_cents(799),
            original_price: None,
            image: "/static/images/keys/rare.svg".into(),
            category: Category::Key,
            quantity: 3,
        };
        let line = PurchaseItem::from(&cart_item);
        assert_eq!(line.title, "Rare Crate Key");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_total(), Price::from_cents(2397));
    }

    #[test]
    fn test_unit_count_and_status() {
        let purchase = Purchase {
            id: PurchaseId::new(1),
            date: Utc::now(),
            items: vec![
                PurchaseItem {
                    title: "VIP Rank".into(),
                    category: Category::Rank,
                    price: Price::from_cents(999),
                    quantity: 1,
                },
                PurchaseItem {
                    title: "Epic Crate Key".into(),
                    category: Category::Key,
                    price: Price::from_cents(1499),
                    quantity: 2,
                },
            ],
            total: Price::from_cents(3997),
            status: PurchaseStatus::Pending,
            order_number: OrderNumber::from_millis(1),
        };
        assert_eq!(purchase.unit_count(), 3);
        assert!(!purchase.is_completed());
    }
}
