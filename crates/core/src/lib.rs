//! Frost Core - Shared domain types for the Frost Network store.
//!
//! This crate provides the types and state machines used by every Frost
//! component:
//! - `storefront` - Public store, checkout, account dashboard and admin panel
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types, reducers and pure functions - no I/O,
//! no database access, no HTTP. Reducers take the previous state by value and
//! return the next one, so the storefront decides where state is persisted.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, usernames and statuses
//! - [`cart`] - Shopping cart reducer
//! - [`auth`] - User profile and authentication reducer
//! - [`purchase`] - Completed orders and their line items
//! - [`leaderboard`] - Top spender ranking

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod leaderboard;
pub mod purchase;
pub mod types;

pub use auth::{AuthAction, AuthState, ProfileUpdate, User};
pub use cart::{CartAction, CartItem, CartState};
pub use leaderboard::{LEADERBOARD_SIZE, LeaderboardEntry, SpenderTotals, standings};
pub use purchase::{OrderNumber, Purchase, PurchaseItem};
pub use types::*;
