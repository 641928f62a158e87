//! Checkout flow.
//!
//! No payment provider is involved. A checkout validates the buyer details,
//! waits out a simulated gateway round trip, optionally fails at random, and
//! on success records the purchase for signed-in buyers.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use frost_core::{CartState, Email, OrderNumber, PurchaseItem, PurchaseStatus, UserId};

use crate::config::PaymentConfig;
use crate::db::{NewPurchase, PurchaseStore, RepositoryError};
use crate::models::LastOrder;

/// Supported (simulated) payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Paypal,
    Card,
    Gcash,
    Apple,
    Google,
}

impl PaymentMethod {
    pub const ALL: [Self; 5] = [
        Self::Paypal,
        Self::Card,
        Self::Gcash,
        Self::Apple,
        Self::Google,
    ];

    /// Form value.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Paypal => "paypal",
            Self::Card => "card",
            Self::Gcash => "gcash",
            Self::Apple => "apple",
            Self::Google => "google",
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Paypal => "PayPal",
            Self::Card => "Credit/Debit Card",
            Self::Gcash => "GCash",
            Self::Apple => "Apple Pay",
            Self::Google => "Google Pay",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Paypal => "Pay with your PayPal account",
            Self::Card => "Visa, MasterCard, American Express",
            Self::Gcash => "Pay with GCash mobile wallet",
            Self::Apple => "Pay with Touch ID or Face ID",
            Self::Google => "Pay with Google Pay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or(CheckoutError::InvalidPaymentMethod)
    }
}

/// Checkout form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub minecraft_username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub discord_tag: String,
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub payment_method: String,
}

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] frost_core::EmailError),

    #[error("unknown payment method")]
    InvalidPaymentMethod,

    #[error("cart is empty")]
    EmptyCart,

    /// The simulated gateway declined the payment.
    #[error("payment declined: insufficient funds")]
    PaymentDeclined,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CheckoutError {
    /// Message shown on the checkout page.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField(field) => format!("Please fill in your {field}."),
            Self::InvalidEmail(_) => "Please enter a valid email address.".to_string(),
            Self::InvalidPaymentMethod => "Please choose a payment method.".to_string(),
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::PaymentDeclined => {
                "Payment failed: insufficient funds. Please try another payment method.".to_string()
            }
            Self::Repository(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Validated buyer details.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Buyer {
    minecraft_username: String,
    email: Email,
    discord_tag: Option<String>,
    special_instructions: Option<String>,
    payment_method: PaymentMethod,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TryFrom<&CheckoutForm> for Buyer {
    type Error = CheckoutError;

    fn try_from(form: &CheckoutForm) -> Result<Self, Self::Error> {
        let minecraft_username = non_empty(&form.minecraft_username)
            .ok_or(CheckoutError::MissingField("Minecraft username"))?;
        let email = non_empty(&form.email).ok_or(CheckoutError::MissingField("email"))?;
        let email = Email::parse(&email)?;
        let payment_method = non_empty(&form.payment_method)
            .ok_or(CheckoutError::MissingField("payment method"))?
            .parse()?;

        Ok(Self {
            minecraft_username,
            email,
            discord_tag: non_empty(&form.discord_tag),
            special_instructions: non_empty(&form.special_instructions),
            payment_method,
        })
    }
}

/// Checkout service.
pub struct CheckoutService<'a> {
    purchases: &'a dyn PurchaseStore,
    payment: PaymentConfig,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(purchases: &'a dyn PurchaseStore, payment: PaymentConfig) -> Self {
        Self { purchases, payment }
    }

    /// Run a checkout for `cart`.
    ///
    /// The cart itself is left alone; the caller clears it once the
    /// returned order is safely in the session.
    ///
    /// # Errors
    ///
    /// Returns validation errors before any delay, `CheckoutError::EmptyCart`
    /// for an empty cart, and `CheckoutError::PaymentDeclined` when the
    /// simulated gateway fails.
    #[instrument(skip(self, cart, form), fields(items = cart.item_count()))]
    pub async fn place_order(
        &self,
        cart: &CartState,
        form: &CheckoutForm,
        buyer_id: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Result<LastOrder, CheckoutError> {
        let buyer = Buyer::try_from(form)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        tokio::time::sleep(self.payment.delay).await;

        if self.payment_fails() {
            tracing::warn!(method = %buyer.payment_method, "simulated payment declined");
            return Err(CheckoutError::PaymentDeclined);
        }

        let order_number = OrderNumber::at(now);
        let items: Vec<PurchaseItem> = cart.items().iter().map(PurchaseItem::from).collect();

        if let Some(user_id) = buyer_id {
            self.purchases
                .record(NewPurchase {
                    user_id,
                    order_number: order_number.clone(),
                    items: items.clone(),
                    total: cart.total(),
                    status: PurchaseStatus::Completed,
                    created_at: now,
                })
                .await?;
        }

        tracing::info!(order = %order_number, total = %cart.total(), "order placed");

        Ok(LastOrder {
            order_number,
            placed_at: now,
            items,
            total: cart.total(),
            payment_method: buyer.payment_method,
            minecraft_username: buyer.minecraft_username,
            email: buyer.email.into_inner(),
            discord_tag: buyer.discord_tag,
            special_instructions: buyer.special_instructions,
        })
    }

    fn payment_fails(&self) -> bool {
        let rate = self.payment.failure_rate.clamp(0.0, 1.0);
        rate > 0.0 && rand::rng().random_bool(rate)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::db::MemoryStore;
    use frost_core::{CartAction, CartItem, Category, Price};

    fn instant(failure_rate: f64) -> PaymentConfig {
        PaymentConfig {
            delay: Duration::ZERO,
            failure_rate,
        }
    }

    fn cart() -> CartState {
        let vip = CartItem {
            id: "rank-vip".to_string(),
            title: "VIP".to_string(),
            price: Price::from_cents(999),
            original_price: None,
            image: "/static/images/ranks/vip.svg".to_string(),
            category: Category::Rank,
            quantity: 1,
        };
        CartState::new()
            .reduce(CartAction::AddItem(vip.clone()))
            .reduce(CartAction::AddItem(vip))
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            minecraft_username: "Steve".to_string(),
            email: "steve@example.com".to_string(),
            discord_tag: String::new(),
            special_instructions: "  ".to_string(),
            payment_method: "gcash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_checkout_records_purchase() {
        let store = MemoryStore::new();
        let service = CheckoutService::new(&store, instant(0.0));
        let now = Utc::now();

        let order = service
            .place_order(&cart(), &form(), Some(UserId::new(1)), now)
            .await
            .unwrap();

        assert!(order.order_number.as_str().starts_with("MC-"));
        assert_eq!(order.order_number.as_str().len(), 9);
        assert_eq!(order.total, Price::from_cents(1998));
        assert_eq!(order.payment_method, PaymentMethod::Gcash);
        assert_eq!(order.special_instructions, None);
        assert_eq!(store.purchase_count().await, 1);
    }

    #[tokio::test]
    async fn test_guest_checkout_records_nothing() {
        let store = MemoryStore::new();
        let service = CheckoutService::new(&store, instant(0.0));
        service
            .place_order(&cart(), &form(), None, Utc::now())
            .await
            .unwrap();
        assert_eq!(store.purchase_count().await, 0);
    }

    #[tokio::test]
    async fn test_certain_failure_declines() {
        let store = MemoryStore::new();
        let service = CheckoutService::new(&store, instant(1.0));
        let err = service
            .place_order(&cart(), &form(), Some(UserId::new(1)), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::PaymentDeclined));
        assert!(err.user_message().contains("insufficient funds"));
        assert_eq!(store.purchase_count().await, 0);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let store = MemoryStore::new();
        let service = CheckoutService::new(&store, instant(0.0));
        let err = service
            .place_order(&CartState::new(), &form(), None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_required_fields() {
        let store = MemoryStore::new();
        let service = CheckoutService::new(&store, instant(0.0));

        let missing_name = CheckoutForm {
            minecraft_username: " ".to_string(),
            ..form()
        };
        let result = service
            .place_order(&cart(), &missing_name, None, Utc::now())
            .await;
        assert!(matches!(
            result,
            Err(CheckoutError::MissingField("Minecraft username"))
        ));

        let bad_email = CheckoutForm {
            email: "steve".to_string(),
            ..form()
        };
        let result = service
            .place_order(&cart(), &bad_email, None, Utc::now())
            .await;
        assert!(matches!(result, Err(CheckoutError::InvalidEmail(_))));

        let bad_method = CheckoutForm {
            payment_method: "bitcoin".to_string(),
            ..form()
        };
        let result = service
            .place_order(&cart(), &bad_method, None, Utc::now())
            .await;
        assert!(matches!(result, Err(CheckoutError::InvalidPaymentMethod)));
    }

    #[test]
    fn test_payment_method_ids() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.id().parse::<PaymentMethod>().unwrap(), method);
        }
        assert_eq!(PaymentMethod::Apple.to_string(), "Apple Pay");
    }
}
