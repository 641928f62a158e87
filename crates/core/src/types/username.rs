//! Minecraft username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`MinecraftUsername`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// Fewer than 3 or more than 16 characters.
    #[error("username must be between {min} and {max} characters")]
    Length {
        /// Minimum allowed length.
        min: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// Contains something other than ASCII letters, digits and underscores.
    #[error("username may only contain letters, numbers and underscores")]
    InvalidCharacter,
    /// Starts or ends with an underscore.
    #[error("username cannot start or end with an underscore")]
    EdgeUnderscore,
    /// Contains two or more underscores in a row.
    #[error("username cannot contain consecutive underscores")]
    RepeatedUnderscore,
}

/// A Minecraft Java Edition username.
///
/// Only the format is checked; the name is never resolved against Mojang.
///
/// ```
/// use frost_core::MinecraftUsername;
///
/// assert!(MinecraftUsername::parse("CraftMaster2024").is_ok());
/// assert!(MinecraftUsername::parse("ab").is_err());
/// assert!(MinecraftUsername::parse("_Steve").is_err());
/// assert!(MinecraftUsername::parse("Big__Steve").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct MinecraftUsername(String);

impl MinecraftUsername {
    /// Minimum username length.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum username length.
    pub const MAX_LENGTH: usize = 16;

    /// Parse a username, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns a [`UsernameError`] for the first rule the input breaks.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let s = s.trim();

        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&s.len()) {
            return Err(UsernameError::Length {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
            });
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(UsernameError::InvalidCharacter);
        }

        if s.starts_with('_') || s.ends_with('_') {
            return Err(UsernameError::EdgeUnderscore);
        }

        if s.contains("__") {
            return Err(UsernameError::RepeatedUnderscore);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Head render URL used as the profile avatar.
    #[must_use]
    pub fn avatar_url(&self) -> String {
        format!("https://mc-heads.net/avatar/{}/64", self.0)
    }
}

impl fmt::Display for MinecraftUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for MinecraftUsername {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MinecraftUsername {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MinecraftUsername> for String {
    fn from(username: MinecraftUsername) -> Self {
        username.0
    }
}

impl AsRef<str> for MinecraftUsername {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
