//! Domain models for storefront.

pub mod session;
pub mod user;

pub use session::{LastOrder, keys};
pub use user::{Account, AccountChanges, NewAccount};
