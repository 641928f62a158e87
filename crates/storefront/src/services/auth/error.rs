//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] frost_core::EmailError),

    /// Minecraft username does not follow Mojang's rules.
    #[error("invalid minecraft username: {0}")]
    InvalidUsername(#[from] frost_core::UsernameError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Short code carried in `?error=` redirects back to the auth forms.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => "invalid_email",
            Self::InvalidUsername(_) => "invalid_username",
            Self::InvalidCredentials | Self::UserNotFound => "invalid_credentials",
            Self::UserAlreadyExists => "email_taken",
            Self::WeakPassword(_) => "weak_password",
            Self::Repository(_) | Self::PasswordHash => "server_error",
        }
    }
}
