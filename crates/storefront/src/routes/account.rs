//! Account route handlers.
//!
//! These routes require a signed-in player.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use frost_core::{ProfileUpdate, User};

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::middleware::auth::{refresh_user, sign_out, update_profile};
use crate::routes::auth::error_message;
use crate::routes::layout::Layout;
use crate::services::auth::{AuthError, AuthService, ProfileInput};
use crate::state::AppState;

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub profile: User,
    pub days_active: i64,
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/settings.html")]
pub struct SettingsTemplate {
    pub layout: Layout,
    pub profile: User,
    pub saved: bool,
    pub error: Option<&'static str>,
}

/// Settings form data.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub minecraft_username: String,
    #[serde(default)]
    pub discord_tag: String,
}

/// Query parameters for the settings page.
#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    pub saved: Option<String>,
    pub error: Option<String>,
}

/// Reload the profile from the stores so totals and history are current.
///
/// An account that has disappeared ends the session.
async fn fresh_profile(
    state: &AppState,
    session: &Session,
    user: &User,
) -> Result<Option<User>, AppError> {
    match AuthService::new(state.users(), state.purchases())
        .profile(user.id)
        .await
    {
        Ok(profile) => {
            refresh_user(session, profile.clone()).await?;
            Ok(Some(profile))
        }
        Err(AuthError::UserNotFound) => {
            tracing::warn!(user_id = %user.id, "session user no longer exists");
            sign_out(session).await?;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Display account overview with purchase history.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    let Some(profile) = fresh_profile(&state, &session, &user).await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    let days_active = (Utc::now().date_naive() - profile.join_date)
        .num_days()
        .max(0);

    Ok(DashboardTemplate {
        layout: Layout::load(&state, &session, "dashboard").await,
        profile,
        days_active,
    }
    .into_response())
}

/// Display profile settings.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn settings_page(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Query(query): Query<SettingsQuery>,
) -> Result<Response, AppError> {
    let Some(profile) = fresh_profile(&state, &session, &user).await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    Ok(SettingsTemplate {
        layout: Layout::load(&state, &session, "settings").await,
        profile,
        saved: query.saved.is_some(),
        error: query.error.as_deref().and_then(error_message),
    }
    .into_response())
}

/// Save profile settings and merge them into the session user.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_settings(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<SettingsForm>,
) -> Result<Response, AppError> {
    let input = ProfileInput {
        email: form.email,
        minecraft_username: form.minecraft_username,
        discord_tag: form.discord_tag,
    };

    let account = match AuthService::new(state.users(), state.purchases())
        .update_profile(user.id, &input)
        .await
    {
        Ok(account) => account,
        Err(err @ (AuthError::Repository(_) | AuthError::PasswordHash)) => return Err(err.into()),
        Err(err) => {
            tracing::info!(error = %err, "settings rejected");
            return Ok(Redirect::to(&format!("/settings?error={}", err.code())).into_response());
        }
    };

    update_profile(
        &session,
        ProfileUpdate {
            email: Some(account.email),
            minecraft_username: Some(account.minecraft_username),
            discord_tag: Some(account.discord_tag),
        },
    )
    .await?;

    tracing::info!("profile updated");
    Ok(Redirect::to("/settings?saved=1").into_response())
}
