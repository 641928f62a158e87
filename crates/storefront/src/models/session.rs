//! Session-related types.
//!
//! Everything the storefront keeps per visitor lives in the tower-sessions
//! record under one of the [`keys`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use frost_core::{OrderNumber, Price, PurchaseItem};

use crate::services::checkout::PaymentMethod;

/// The most recent successful checkout, shown on the confirmation page and
/// used to render the downloadable receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOrder {
    pub order_number: OrderNumber,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<PurchaseItem>,
    pub total: Price,
    pub payment_method: PaymentMethod,
    pub minecraft_username: String,
    pub email: String,
    pub discord_tag: Option<String>,
    pub special_instructions: Option<String>,
}

/// Session keys.
pub mod keys {
    /// Authentication state ([`frost_core::AuthState`]).
    pub const AUTH: &str = "auth";

    /// Cart snapshot ([`frost_core::CartState`]).
    pub const CART: &str = "cart";

    /// Last completed order ([`super::LastOrder`]).
    pub const LAST_ORDER: &str = "last_order";
}
