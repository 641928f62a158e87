//! Page chrome shared by every full-page template.

use tower_sessions::Session;

use frost_core::{CartState, User};

use crate::middleware::auth::load_auth_state;
use crate::routes::cart::load_cart;
use crate::state::AppState;

/// What `base.html` needs: the signed-in user, the cart drawer, and links.
pub struct Layout {
    pub user: Option<User>,
    pub cart: CartState,
    pub discord_invite: String,
    /// Nav entry to highlight (`home`, `ranks`, `keys`, ...).
    pub active: &'static str,
}

impl Layout {
    /// Load the chrome for the current session.
    pub async fn load(state: &AppState, session: &Session, active: &'static str) -> Self {
        Self {
            user: load_auth_state(session).await.into_user(),
            cart: load_cart(session).await,
            discord_invite: state.config().discord_invite.clone(),
            active,
        }
    }

    #[must_use]
    pub const fn signed_in(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Username for the nav menu, empty when signed out.
    #[must_use]
    pub fn username(&self) -> &str {
        self.user
            .as_ref()
            .map_or("", |u| u.minecraft_username.as_str())
    }

    /// Avatar for the nav menu, empty when signed out.
    #[must_use]
    pub fn avatar(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.avatar.as_str())
    }
}

/// A same-site path to send the browser back to.
///
/// Anything that is not an absolute local path (including `//host`)
/// falls back to `fallback`. Browsers drop tabs and newlines from URLs,
/// so any whitespace or control character is rejected as well.
#[must_use]
pub fn local_redirect<'a>(next: Option<&'a str>, fallback: &'a str) -> &'a str {
    match next {
        Some(path) if is_local_path(path) => path,
        _ => fallback,
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path
            .chars()
            .any(|c| c == '\\' || c.is_whitespace() || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_redirect() {
        assert_eq!(local_redirect(Some("/ranks"), "/"), "/ranks");
        assert_eq!(local_redirect(Some("//evil.example"), "/"), "/");
        assert_eq!(
            local_redirect(Some("https://evil.example"), "/cart"),
            "/cart"
        );
        assert_eq!(local_redirect(Some("/\\evil.example"), "/"), "/");
        assert_eq!(local_redirect(None, "/keys"), "/keys");
    }

    #[test]
    fn test_local_redirect_rejects_whitespace_and_controls() {
        assert_eq!(local_redirect(Some("/\t/evil.example"), "/"), "/");
        assert_eq!(local_redirect(Some("/\n/evil.example"), "/cart"), "/cart");
        assert_eq!(local_redirect(Some("/\r\n/evil.example"), "/"), "/");
        assert_eq!(local_redirect(Some("/ /evil.example"), "/"), "/");
        assert_eq!(local_redirect(Some("/cart\u{7f}"), "/"), "/");
        assert_eq!(
            local_redirect(Some("/checkout?step=2"), "/"),
            "/checkout?step=2"
        );
    }
}
