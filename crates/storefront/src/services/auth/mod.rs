//! Authentication service.
//!
//! Password registration and login against the [`UserStore`], plus the
//! profile assembly and settings updates that go with a signed-in account.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use frost_core::{Email, MinecraftUsername, User, UserId};

use crate::db::{PurchaseStore, RepositoryError, UserStore};
use crate::models::{Account, AccountChanges, NewAccount};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Address that used to sign in as admin without a password check.
///
/// It gets no special treatment any more; attempts are logged so operators
/// notice anyone still relying on it.
const RETIRED_ADMIN_EMAIL: &str = "admin@frostnetwork.com";

/// Raw settings form input. Empty strings mean "unchanged", except for the
/// Discord tag where an empty value clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub email: String,
    pub minecraft_username: String,
    pub discord_tag: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    purchases: &'a dyn PurchaseStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore, purchases: &'a dyn PurchaseStore) -> Self {
        Self { users, purchases }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `AuthError::InvalidUsername` for
    /// malformed input, `AuthError::WeakPassword` for short passwords and
    /// `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        minecraft_username: &str,
    ) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;
        let minecraft_username = MinecraftUsername::parse(minecraft_username)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let account = self
            .users
            .create(NewAccount {
                email,
                password_hash,
                minecraft_username,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %account.id, "account registered");
        Ok(account)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        if email.as_str() == RETIRED_ADMIN_EMAIL {
            tracing::warn!("login attempt with the retired admin shortcut address");
        }

        let account = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &account.password_hash)?;

        Ok(account)
    }

    /// Load an account and its purchases as a player profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    pub async fn profile(&self, user_id: UserId) -> Result<User, AuthError> {
        let account = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        self.profile_for(account).await
    }

    /// Attach purchase history to an already loaded account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if purchases cannot be loaded.
    pub async fn profile_for(&self, account: Account) -> Result<User, AuthError> {
        let history = self.purchases.list_for_user(account.id).await?;
        Ok(account.into_profile(history))
    }

    /// Persist settings changes.
    ///
    /// # Errors
    ///
    /// Returns validation errors for malformed fields and
    /// `AuthError::UserAlreadyExists` when the new email is taken.
    #[instrument(skip(self, input))]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        input: &ProfileInput,
    ) -> Result<Account, AuthError> {
        let changes = parse_profile_input(input)?;
        self.users
            .update_profile(user_id, changes)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }
}

fn parse_profile_input(input: &ProfileInput) -> Result<AccountChanges, AuthError> {
    let email = match input.email.trim() {
        "" => None,
        raw => Some(Email::parse(raw)?),
    };
    let minecraft_username = match input.minecraft_username.trim() {
        "" => None,
        raw => Some(MinecraftUsername::parse(raw)?),
    };
    let discord_tag = match input.discord_tag.trim() {
        "" => None,
        raw => Some(raw.to_string()),
    };

    Ok(AccountChanges {
        email,
        minecraft_username,
        discord_tag: Some(discord_tag),
    })
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &store);

        let account = auth
            .register("Steve@Example.com", "diamonds", "Steve")
            .await
            .unwrap();
        assert_eq!(account.email.as_str(), "steve@example.com");
        assert_ne!(account.password_hash, "diamonds");

        let logged_in = auth.login("steve@example.com", "diamonds").await.unwrap();
        assert_eq!(logged_in.id, account.id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &store);
        auth.register("steve@example.com", "diamonds", "Steve")
            .await
            .unwrap();

        let err = auth
            .login("steve@example.com", "emeralds")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        let err = auth
            .login("alex@example.com", "diamonds")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_retired_admin_email_needs_real_password() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &store);
        let err = auth
            .login("admin@frostnetwork.com", "anything")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &store);

        assert!(matches!(
            auth.register("not-an-email", "diamonds", "Steve").await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.register("s@example.com", "diamonds", "_Steve").await,
            Err(AuthError::InvalidUsername(_))
        ));
        assert!(matches!(
            auth.register("s@example.com", "12345", "Steve").await,
            Err(AuthError::WeakPassword(_))
        ));
        assert_eq!(store.account_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &store);
        auth.register("steve@example.com", "diamonds", "Steve")
            .await
            .unwrap();
        let err = auth
            .register("steve@example.com", "other-pass", "Steve2")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
        assert_eq!(err.code(), "email_taken");
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &store);
        let account = auth
            .register("steve@example.com", "diamonds", "Steve")
            .await
            .unwrap();

        let updated = auth
            .update_profile(
                account.id,
                &ProfileInput {
                    email: String::new(),
                    minecraft_username: "Herobrine".to_string(),
                    discord_tag: "hero#0001".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email.as_str(), "steve@example.com");
        assert_eq!(updated.minecraft_username.as_str(), "Herobrine");
        assert_eq!(updated.discord_tag.as_deref(), Some("hero#0001"));

        let profile = auth.profile(account.id).await.unwrap();
        assert_eq!(profile.avatar, "https://mc-heads.net/avatar/Herobrine/64");
    }

    #[test]
    fn test_parse_profile_input_clears_discord_tag() {
        let changes = parse_profile_input(&ProfileInput::default()).unwrap();
        assert!(changes.email.is_none());
        assert!(changes.minecraft_username.is_none());
        assert_eq!(changes.discord_tag, Some(None));
    }
}
