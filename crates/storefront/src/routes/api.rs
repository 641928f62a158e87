//! JSON API handlers.
//!
//! Errors are `{"error": "..."}` bodies with the matching status code.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frost_core::{CartState, LeaderboardEntry};

use crate::error::AppError;
use crate::routes::cart::load_cart;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

// =============================================================================
// Registration
// =============================================================================

/// Registration request. Every field is required.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub minecraft_username: Option<String>,
}

/// Public view of a freshly created account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: i32,
    pub email: String,
    pub minecraft_username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub user: RegisteredUser,
}

fn required(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// `POST /api/auth/register`.
///
/// 400 for missing or invalid fields, 409 when the email is taken (nothing
/// is inserted), 500 on storage failure.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return error_body(StatusCode::BAD_REQUEST, "Invalid JSON body");
    };

    let (Some(email), Some(password), Some(username)) = (
        required(request.email.as_ref()),
        request.password.as_deref().filter(|p| !p.is_empty()),
        required(request.minecraft_username.as_ref()),
    ) else {
        return error_body(StatusCode::BAD_REQUEST, "All fields are required");
    };

    match AuthService::new(state.users(), state.purchases())
        .register(email, password, username)
        .await
    {
        Ok(account) => Json(RegisterResponse {
            success: true,
            user: RegisteredUser {
                id: account.id.as_i32(),
                email: account.email.into_inner(),
                minecraft_username: account.minecraft_username.as_str().to_string(),
                created_at: account.created_at,
            },
        })
        .into_response(),
        Err(AuthError::UserAlreadyExists) => {
            error_body(StatusCode::CONFLICT, "Email already registered")
        }
        Err(err @ (AuthError::Repository(_) | AuthError::PasswordHash)) => {
            tracing::error!(error = %err, "Registration error");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to register user")
        }
        Err(err) => AppError::from(err).into_json_response(),
    }
}

// =============================================================================
// Leaderboard
// =============================================================================

/// One leaderboard row as served to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub rank: u32,
    pub id: i32,
    pub minecraft_username: String,
    pub total_spent: f64,
    pub total_purchases: u32,
}

impl From<&LeaderboardEntry> for LeaderboardRow {
    fn from(entry: &LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            id: entry.user_id.as_i32(),
            minecraft_username: entry.minecraft_username.clone(),
            total_spent: entry.total_spent.to_f64(),
            total_purchases: entry.total_purchases,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub leaderboard: Vec<LeaderboardRow>,
}

/// `GET /api/leaderboard`: top spenders, highest first.
#[instrument(skip_all)]
pub async fn leaderboard(State(state): State<AppState>) -> Response {
    match state.leaderboard().standings(state.purchases()).await {
        Ok(entries) => Json(LeaderboardResponse {
            success: true,
            leaderboard: entries.iter().map(LeaderboardRow::from).collect(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Leaderboard error: {e}");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch leaderboard",
            )
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// `GET /api/cart`: the session cart.
#[instrument(skip_all)]
pub async fn cart(session: Session) -> Json<CartState> {
    Json(load_cart(&session).await)
}
