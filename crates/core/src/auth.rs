//! Signed-in user profile and the authentication state machine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::purchase::Purchase;
use crate::types::{Email, MinecraftUsername, Price, UserId, UserRole};

/// Rank shown for accounts that have not bought one.
pub const DEFAULT_RANK: &str = "Member";

/// Perks every account starts with.
pub const DEFAULT_PERKS: &[&str] = &["Basic Chat"];

/// A storefront account as presented to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub minecraft_username: MinecraftUsername,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_tag: Option<String>,
    pub join_date: NaiveDate,
    pub total_spent: Price,
    pub current_rank: String,
    /// Avatar image derived from the Minecraft username.
    pub avatar: String,
    pub perks: Vec<String>,
    #[serde(default)]
    pub purchase_history: Vec<Purchase>,
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    /// A freshly registered account: `Member` rank, basic perks, no spend.
    #[must_use]
    pub fn new_member(
        id: UserId,
        email: Email,
        minecraft_username: MinecraftUsername,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            avatar: minecraft_username.avatar_url(),
            email,
            minecraft_username,
            discord_tag: None,
            join_date: created_at.date_naive(),
            total_spent: Price::ZERO,
            current_rank: DEFAULT_RANK.to_string(),
            perks: DEFAULT_PERKS.iter().map(ToString::to_string).collect(),
            purchase_history: Vec::new(),
            role: UserRole::User,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Replace the purchase history and recompute `total_spent` from the
    /// completed purchases in it.
    pub fn set_purchase_history(&mut self, history: Vec<Purchase>) {
        self.total_spent = history
            .iter()
            .filter(|p| p.is_completed())
            .map(|p| p.total)
            .sum();
        self.purchase_history = history;
    }
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: Option<Email>,
    /// A new username also replaces the avatar.
    pub minecraft_username: Option<MinecraftUsername>,
    /// `Some(None)` clears the tag.
    pub discord_tag: Option<Option<String>>,
}

impl ProfileUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.minecraft_username.is_none() && self.discord_tag.is_none()
    }

    fn apply(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(username) = self.minecraft_username {
            user.avatar = username.avatar_url();
            user.minecraft_username = username;
        }
        if let Some(tag) = self.discord_tag {
            user.discord_tag = tag;
        }
    }
}

/// Authentication transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    LoginStart,
    LoginSuccess(Box<User>),
    LoginFailure,
    Logout,
    UpdateProfile(ProfileUpdate),
}

/// Who is signed in, if anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    user: Option<User>,
    is_authenticated: bool,
    is_loading: bool,
}

impl AuthState {
    /// Signed out, not loading.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action and return the resulting state.
    ///
    /// `UpdateProfile` while signed out is a no-op.
    #[must_use]
    pub fn reduce(self, action: AuthAction) -> Self {
        match action {
            AuthAction::LoginStart => Self {
                is_loading: true,
                ..self
            },
            AuthAction::LoginSuccess(user) => Self {
                user: Some(*user),
                is_authenticated: true,
                is_loading: false,
            },
            AuthAction::LoginFailure | AuthAction::Logout => Self::new(),
            AuthAction::UpdateProfile(update) => {
                let mut next = self;
                if let Some(user) = next.user.as_mut() {
                    update.apply(user);
                }
                next
            }
        }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn into_user(self) -> Option<User> {
        self.user
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }
}
