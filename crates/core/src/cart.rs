//! Shopping cart state machine.
//!
//! The cart is a plain value: [`CartState::reduce`] consumes the current
//! state and an action and returns the next state. Derived totals are
//! private and recomputed after every change to the item list, so they can
//! never drift from the items themselves.

use serde::{Deserialize, Serialize};

use crate::types::{Category, Price};

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id, e.g. `rank-vip`. Unique within a cart.
    pub id: String,
    pub title: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub image: String,
    pub category: Category,
    pub quantity: u32,
}

impl CartItem {
    /// Line total (`price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Cart transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit. An existing line with the same id is incremented;
    /// otherwise the item is appended with quantity 1 regardless of the
    /// quantity it carries.
    AddItem(CartItem),
    RemoveItem(String),
    /// Set a line's quantity. Zero or negative removes the line.
    UpdateQuantity {
        id: String,
        quantity: i64,
    },
    ClearCart,
    OpenCart,
    CloseCart,
    ToggleCart,
}

/// Snapshot shape accepted when a cart is read back from storage.
///
/// Only the items and visibility are trusted; totals are rebuilt.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartSnapshot {
    #[serde(default)]
    items: Vec<CartItem>,
    #[serde(default)]
    is_open: bool,
}

/// The cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CartSnapshot")]
pub struct CartState {
    items: Vec<CartItem>,
    is_open: bool,
    total: Price,
    item_count: u32,
}

impl From<CartSnapshot> for CartState {
    fn from(snapshot: CartSnapshot) -> Self {
        let mut cart = Self::restore(snapshot.items);
        cart.is_open = snapshot.is_open;
        cart
    }
}

impl CartState {
    /// An empty, closed cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted items by replaying them through the
    /// reducer: each item is added once, then set to its stored quantity.
    #[must_use]
    pub fn restore(items: impl IntoIterator<Item = CartItem>) -> Self {
        items.into_iter().fold(Self::new(), |cart, item| {
            let id = item.id.clone();
            let quantity = i64::from(item.quantity);
            cart.reduce(CartAction::AddItem(item))
                .reduce(CartAction::UpdateQuantity { id, quantity })
        })
    }

    /// Apply an action and return the resulting state.
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::AddItem(item) => {
                if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
                    existing.quantity = existing.quantity.saturating_add(1);
                } else {
                    self.items.push(CartItem {
                        quantity: 1,
                        ..item
                    });
                }
                self.recompute();
            }
            CartAction::RemoveItem(id) => {
                self.items.retain(|i| i.id != id);
                self.recompute();
            }
            CartAction::UpdateQuantity { id, quantity } => {
                if quantity <= 0 {
                    self.items.retain(|i| i.id != id);
                } else if let Some(existing) = self.items.iter_mut().find(|i| i.id == id) {
                    existing.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                }
                self.recompute();
            }
            CartAction::ClearCart => {
                self.items.clear();
                self.recompute();
            }
            CartAction::OpenCart => self.is_open = true,
            CartAction::CloseCart => self.is_open = false,
            CartAction::ToggleCart => self.is_open = !self.is_open,
        }
        self
    }

    fn recompute(&mut self) {
        self.total = self.items.iter().map(CartItem::line_total).sum();
        self.item_count = self
            .items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity));
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    #[must_use]
    pub const fn item_count(&self) -> u32 {
        self.item_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of a product currently in the cart (0 when absent).
    #[must_use]
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.id == id)
            .map_or(0, |i| i.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, cents: i64) -> CartItem {
        CartItem {
            id: id.to_string(),
            title: id.to_uppercase(),
            price: Price::from_cents(cents),
            original_price: None,
            image: "/static/images/placeholder.svg".to_string(),
            category: Category::Rank,
            quantity: 1,
        }
    }

    fn add(cart: CartState, id: &str, cents: i64) -> CartState {
        cart.reduce(CartAction::AddItem(item(id, cents)))
    }

    #[test]
    fn test_add_same_item_accumulates() {
        for n in 1..=7_u32 {
            let cart = (0..n).fold(CartState::new(), |c, _| add(c, "vip", 999));
            assert_eq!(cart.items().len(), 1);
            assert_eq!(cart.item_count(), n);
            assert_eq!(cart.total(), Price::from_cents(999).times(n));
        }
    }

    #[test]
    fn test_vip_twice_then_zero_quantity() {
        let cart = add(add(CartState::new(), "rank-vip", 999), "rank-vip", 999);
        assert_eq!(cart.total(), Price::from_cents(1998));
        assert_eq!(cart.item_count(), 2);

        let cart = cart.reduce(CartAction::UpdateQuantity {
            id: "rank-vip".to_string(),
            quantity: 0,
        });
        assert!(cart.items().is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_ignores_incoming_quantity() {
        let cart = CartState::new().reduce(CartAction::AddItem(CartItem {
            quantity: 40,
            ..item("key-epic", 1499)
        }));
        assert_eq!(cart.quantity_of("key-epic"), 1);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let cart = add(add(CartState::new(), "rank-vip", 999), "key-rare", 799);
        let after = cart
            .clone()
            .reduce(CartAction::RemoveItem("unban-standard".into()));
        assert_eq!(after, cart);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let cart = add(CartState::new(), "rank-vip", 999);
        let after = cart.clone().reduce(CartAction::UpdateQuantity {
            id: "nope".into(),
            quantity: 5,
        });
        assert_eq!(after, cart);
    }

    #[test]
    fn test_zero_quantity_matches_remove() {
        let cart = add(add(CartState::new(), "rank-vip", 999), "key-rare", 799);
        let removed = cart
            .clone()
            .reduce(CartAction::RemoveItem("key-rare".into()));
        let zeroed = cart.clone().reduce(CartAction::UpdateQuantity {
            id: "key-rare".into(),
            quantity: 0,
        });
        let negative = cart.reduce(CartAction::UpdateQuantity {
            id: "key-rare".into(),
            quantity: -3,
        });
        assert_eq!(removed, zeroed);
        assert_eq!(removed, negative);
    }

    #[test]
    fn test_update_quantity_recomputes() {
        let cart = add(add(CartState::new(), "rank-vip", 999), "key-rare", 799);
        let cart = cart.reduce(CartAction::UpdateQuantity {
            id: "key-rare".into(),
            quantity: 3,
        });
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.total(), Price::from_cents(999 + 3 * 799));
    }

    #[test]
    fn test_clear_cart() {
        let cart = add(add(CartState::new(), "rank-vip", 999), "key-rare", 799)
            .reduce(CartAction::OpenCart)
            .reduce(CartAction::ClearCart);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
        assert!(cart.is_open());
    }

    #[test]
    fn test_visibility_actions_leave_items_alone() {
        let cart = add(CartState::new(), "rank-vip", 999);
        let opened = cart.clone().reduce(CartAction::OpenCart);
        assert!(opened.is_open());
        assert_eq!(opened.items(), cart.items());

        let toggled = opened.reduce(CartAction::ToggleCart);
        assert!(!toggled.is_open());
        assert!(toggled.reduce(CartAction::ToggleCart).is_open());
        assert!(!cart.reduce(CartAction::CloseCart).is_open());
    }

    #[test]
    fn test_restore_rebuilds_totals() {
        let items = vec![
            CartItem {
                quantity: 2,
                ..item("rank-vip", 999)
            },
            CartItem {
                quantity: 0,
                ..item("key-rare", 799)
            },
        ];
        let cart = CartState::restore(items);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), Price::from_cents(1998));
    }

    #[test]
    fn test_deserialize_ignores_stored_totals() {
        let json = r#"{
            "items": [{
                "id": "rank-vip", "title": "VIP", "price": "9.99",
                "image": "/x.png", "category": "rank", "quantity": 3
            }],
            "isOpen": true,
            "total": "1000000.00",
            "itemCount": 99
        }"#;
        let cart: CartState = serde_json::from_str(json).unwrap();
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Price::from_cents(2997));
        assert!(cart.is_open());
    }

    #[test]
    fn test_serialize_round_trip_through_session() {
        let cart = add(CartState::new(), "rank-vip", 999);
        let cart = add(cart, "unban-premium", 1999);
        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value["itemCount"], 2);
        let back: CartState = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}
