//! Authentication extractors and session helpers.
//!
//! The signed-in user lives in the session as an [`AuthState`] under
//! [`keys::AUTH`]. Every transition goes through the auth reducer.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use frost_core::{AuthAction, AuthState, ProfileUpdate, User};

use crate::models::keys;

/// Extractor that requires a signed-in user.
///
/// HTML requests without a user are redirected to the login page; API
/// requests get 401.
///
/// ```rust,ignore
/// async fn dashboard(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Welcome back, {}!", user.minecraft_username)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extractor that requires a signed-in admin.
///
/// Signed-out visitors go to the login page; signed-in non-admins go to
/// their dashboard.
pub struct RequireAdmin(pub User);

/// Rejection for the auth extractors.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Redirect a signed-in non-admin to their dashboard.
    RedirectToDashboard,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Forbidden response (for API requests by non-admins).
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::RedirectToDashboard => Redirect::to("/dashboard").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

/// Full request path, before any `nest` prefix stripping.
fn request_path(parts: &Parts) -> &str {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |OriginalUri(uri)| uri.path())
}

fn is_api(parts: &Parts) -> bool {
    request_path(parts).starts_with("/api/")
}

async fn session_user(parts: &Parts) -> Option<User> {
    let session = parts.extensions.get::<Session>()?;
    load_auth_state(session).await.into_user()
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match session_user(parts).await {
            Some(user) => Ok(Self(user)),
            None if is_api(parts) => Err(AuthRejection::Unauthorized),
            None => Err(AuthRejection::RedirectToLogin),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let api = is_api(parts);
        match session_user(parts).await {
            Some(user) if user.is_admin() => Ok(Self(user)),
            Some(user) => {
                tracing::warn!(user_id = %user.id, path = %request_path(parts), "non-admin denied");
                Err(if api {
                    AuthRejection::Forbidden
                } else {
                    AuthRejection::RedirectToDashboard
                })
            }
            None if api => Err(AuthRejection::Unauthorized),
            None => Err(AuthRejection::RedirectToLogin),
        }
    }
}

/// Read the auth state from the session, signed out when absent or unreadable.
pub async fn load_auth_state(session: &Session) -> AuthState {
    session
        .get::<AuthState>(keys::AUTH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Run `action` through the auth reducer and store the result.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn dispatch_auth(
    session: &Session,
    action: AuthAction,
) -> Result<AuthState, tower_sessions::session::Error> {
    let next = load_auth_state(session).await.reduce(action);
    session.insert(keys::AUTH, &next).await?;
    Ok(next)
}

/// Sign `user` in, rotating the session id first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(session: &Session, user: User) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    dispatch_auth(session, AuthAction::LoginStart).await?;
    dispatch_auth(session, AuthAction::LoginSuccess(Box::new(user))).await?;
    Ok(())
}

/// Record a rejected login attempt. Whoever was signed in on this session
/// is signed out.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn fail_sign_in(session: &Session) -> Result<(), tower_sessions::session::Error> {
    dispatch_auth(session, AuthAction::LoginStart).await?;
    dispatch_auth(session, AuthAction::LoginFailure).await?;
    Ok(())
}

/// Replace the session user with a freshly loaded profile.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn refresh_user(
    session: &Session,
    user: User,
) -> Result<(), tower_sessions::session::Error> {
    dispatch_auth(session, AuthAction::LoginSuccess(Box::new(user))).await?;
    Ok(())
}

/// Merge profile changes into the session user.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn update_profile(
    session: &Session,
    update: ProfileUpdate,
) -> Result<(), tower_sessions::session::Error> {
    dispatch_auth(session, AuthAction::UpdateProfile(update)).await?;
    Ok(())
}

/// Sign out. The cart is dropped with the rest of the session.
///
/// # Errors
///
/// Returns an error if the session cannot be flushed.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    dispatch_auth(session, AuthAction::Logout).await?;
    session.flush().await
}
