//! Authentication route handlers.
//!
//! Email and password login, registration, and logout. Failures redirect
//! back to the form with an `?error=<code>` that the page turns into a
//! message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::{fail_sign_in, sign_in, sign_out};
use crate::routes::layout::{Layout, local_redirect};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
    #[serde(default)]
    pub minecraft_username: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub error: Option<&'static str>,
    pub next: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub error: Option<&'static str>,
}

/// Message for an `?error=` code. Unknown codes show nothing.
#[must_use]
pub fn error_message(code: &str) -> Option<&'static str> {
    Some(match code {
        "invalid_credentials" => "Invalid email or password.",
        "invalid_email" => "Please enter a valid email address.",
        "invalid_username" => "Minecraft usernames are 3-16 letters, digits or underscores.",
        "email_taken" => "An account with this email already exists.",
        "weak_password" => "Password must be at least 6 characters long.",
        "password_mismatch" => "Passwords do not match.",
        "missing_fields" => "Please fill in all required fields.",
        "server_error" | "session" => "Something went wrong. Please try again.",
        _ => return None,
    })
}

fn login_redirect(code: &str, next: Option<&str>) -> Response {
    let url = match next {
        Some(next) if local_redirect(Some(next), "") == next => {
            format!("/auth/login?error={code}&next={}", url_encode(next))
        }
        _ => format!("/auth/login?error={code}"),
    };
    Redirect::to(&url).into_response()
}

fn url_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page. Signed-in users go straight to the dashboard.
#[instrument(skip(state, session))]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Response {
    let layout = Layout::load(&state, &session, "login").await;
    if layout.signed_in() {
        return Redirect::to("/dashboard").into_response();
    }

    LoginTemplate {
        layout,
        error: query.error.as_deref().and_then(error_message),
        next: local_redirect(query.next.as_deref(), "").to_string(),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.users(), state.purchases());

    let profile = match auth.login(&form.email, &form.password).await {
        Ok(account) => auth.profile_for(account).await,
        Err(err) => Err(err),
    };

    let user = match profile {
        Ok(user) => user,
        Err(err) => {
            if matches!(err, AuthError::Repository(_) | AuthError::PasswordHash) {
                tracing::error!(error = %err, "login failed");
            } else {
                tracing::info!(error = %err, "login rejected");
            }
            if let Err(e) = fail_sign_in(&session).await {
                tracing::error!("Failed to record login failure: {e}");
            }
            return login_redirect(err.code(), form.next.as_deref());
        }
    };

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "signed in");

    if let Err(e) = sign_in(&session, user).await {
        tracing::error!("Failed to set session: {e}");
        return login_redirect("session", None);
    }

    Redirect::to(local_redirect(form.next.as_deref(), "/dashboard")).into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip(state, session))]
pub async fn register_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Response {
    let layout = Layout::load(&state, &session, "register").await;
    if layout.signed_in() {
        return Redirect::to("/dashboard").into_response();
    }

    RegisterTemplate {
        layout,
        error: query.error.as_deref().and_then(error_message),
    }
    .into_response()
}

/// Handle registration form submission. New players are signed in
/// immediately.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    let fail = |code: &str| Redirect::to(&format!("/auth/register?error={code}")).into_response();

    if form.email.trim().is_empty()
        || form.password.is_empty()
        || form.minecraft_username.trim().is_empty()
    {
        return fail("missing_fields");
    }
    if form.password != form.password_confirm {
        return fail("password_mismatch");
    }

    let auth = AuthService::new(state.users(), state.purchases());
    let user = match auth
        .register(&form.email, &form.password, &form.minecraft_username)
        .await
    {
        Ok(account) => account.into_profile(Vec::new()),
        Err(err) => {
            tracing::warn!(error = %err, "registration failed");
            return fail(err.code());
        }
    };

    set_sentry_user(&user.id, Some(user.email.as_str()));
    if let Err(e) = sign_in(&session, user).await {
        tracing::error!("Failed to set session after registration: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    Redirect::to("/dashboard").into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out and drop the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = sign_out(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();
    Redirect::to("/").into_response()
}
