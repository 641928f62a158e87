//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Registration, password login, profile assembly and updates
//! - `checkout` - Simulated payment flow and purchase recording
//! - `leaderboard` - Cached top-spender standings
//! - `receipt` - Server-rendered order receipts

pub mod auth;
pub mod checkout;
pub mod leaderboard;
pub mod receipt;
