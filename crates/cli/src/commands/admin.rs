//! Admin role management.
//!
//! # Usage
//!
//! ```bash
//! frost-cli admin grant -e steve@example.com
//! frost-cli admin revoke -e steve@example.com
//! ```
//!
//! The account must already be registered. Role changes apply the next time
//! the player signs in.

use frost_core::{Email, UserRole};
use frost_storefront::db::{PgUserStore, RepositoryError, UserStore};
use thiserror::Error;

use super::{CommandError, connect};

/// Errors that can occur during role changes.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] frost_core::EmailError),

    /// No account with that email.
    #[error("No account registered with email: {0}")]
    UnknownAccount(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Set the role of the account registered under `email`.
///
/// # Errors
///
/// Returns `AdminError::UnknownAccount` if nobody registered with `email`.
pub async fn set_role(email: &str, role: UserRole) -> Result<(), AdminError> {
    let email = Email::parse(email)?;
    let users = PgUserStore::new(connect().await?);

    if !users.set_role(&email, role).await? {
        return Err(AdminError::UnknownAccount(email.into_inner()));
    }

    tracing::info!("Role updated: {} is now {}", email, role);
    if role.is_admin() {
        tracing::info!("The player must sign in again to reach /admin");
    }
    Ok(())
}
