//! Order receipts.
//!
//! A receipt is a standalone HTML document rendered from the session's
//! [`LastOrder`]. It is a courtesy copy, not an invoice.

use askama::Template;

use crate::models::LastOrder;

/// Store name printed on receipts.
pub const STORE_NAME: &str = "Frost Network";

#[derive(Template)]
#[template(path = "receipt.html")]
struct ReceiptTemplate<'a> {
    store_name: &'a str,
    order: &'a LastOrder,
}

/// Render the receipt document for an order.
///
/// # Errors
///
/// Returns `askama::Error` if template rendering fails.
pub fn render_receipt(order: &LastOrder) -> Result<String, askama::Error> {
    ReceiptTemplate {
        store_name: STORE_NAME,
        order,
    }
    .render()
}

/// Download file name for an order's receipt.
#[must_use]
pub fn receipt_filename(order: &LastOrder) -> String {
    format!("frost-receipt-{}.html", order.order_number)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::services::checkout::PaymentMethod;
    use frost_core::{Category, OrderNumber, Price, PurchaseItem};

    fn order() -> LastOrder {
        LastOrder {
            order_number: OrderNumber::from_millis(1_718_000_482_913),
            placed_at: Utc.with_ymd_and_hms(2024, 6, 10, 6, 21, 22).unwrap(),
            items: vec![
                PurchaseItem {
                    title: "Diamond".to_string(),
                    category: Category::Rank,
                    price: Price::from_cents(4999),
                    quantity: 1,
                },
                PurchaseItem {
                    title: "Rare Key".to_string(),
                    category: Category::Key,
                    price: Price::from_cents(799),
                    quantity: 2,
                },
            ],
            total: Price::from_cents(6597),
            payment_method: PaymentMethod::Card,
            minecraft_username: "Steve".to_string(),
            email: "steve@example.com".to_string(),
            discord_tag: Some("steve#1234".to_string()),
            special_instructions: None,
        }
    }

    #[test]
    fn test_receipt_contains_order_details() {
        let html = render_receipt(&order()).unwrap();
        assert!(html.contains("MC-482913"));
        assert!(html.contains("Frost Network"));
        assert!(html.contains("Rare Key"));
        assert!(html.contains("$15.98"));
        assert!(html.contains("$65.97"));
        assert!(html.contains("Credit/Debit Card"));
        assert!(html.contains("steve#1234"));
    }

    #[test]
    fn test_receipt_escapes_user_input() {
        let mut order = order();
        order.minecraft_username = "<script>alert(1)</script>".to_string();
        let html = render_receipt(&order).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_receipt_filename() {
        assert_eq!(receipt_filename(&order()), "frost-receipt-MC-482913.html");
    }
}
