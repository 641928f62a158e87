//! Checkout route handlers.
//!
//! `POST /checkout` runs the simulated payment. On success the order goes
//! into the session as [`LastOrder`], the cart is cleared, and the browser
//! lands on the confirmation page, which offers the receipt download.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use frost_core::CartAction;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::auth::{load_auth_state, refresh_user};
use crate::models::{LastOrder, keys};
use crate::routes::cart::{dispatch_cart, load_cart};
use crate::routes::layout::Layout;
use crate::services::auth::AuthService;
use crate::services::checkout::{CheckoutError, CheckoutForm, CheckoutService, PaymentMethod};
use crate::services::receipt::{receipt_filename, render_receipt};
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub form: CheckoutForm,
    pub payment_methods: [PaymentMethod; 5],
    pub error: Option<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub layout: Layout,
    pub order: LastOrder,
}

async fn last_order(session: &Session) -> Option<LastOrder> {
    session
        .get::<LastOrder>(keys::LAST_ORDER)
        .await
        .ok()
        .flatten()
}

/// Display the checkout form, prefilled from the signed-in profile.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Response {
    let layout = Layout::load(&state, &session, "cart").await;
    if layout.cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let form = layout
        .user
        .as_ref()
        .map_or_else(CheckoutForm::default, |user| CheckoutForm {
            minecraft_username: user.minecraft_username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            discord_tag: user.discord_tag.clone().unwrap_or_default(),
            special_instructions: String::new(),
            payment_method: PaymentMethod::default().id().to_string(),
        });

    CheckoutTemplate {
        layout,
        form,
        payment_methods: PaymentMethod::ALL,
        error: None,
    }
    .into_response()
}

/// Run checkout.
///
/// Validation failures and declined payments re-render the form with the
/// buyer's input and a blocking error.
#[instrument(skip(state, session, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    Form(mut form): Form<CheckoutForm>,
) -> Result<Response, AppError> {
    let cart = load_cart(&session).await;
    let buyer = load_auth_state(&session).await.into_user();
    let buyer_id = buyer.as_ref().map(|u| u.id);

    let service = CheckoutService::new(state.purchases(), state.config().payment);
    let order = match service
        .place_order(&cart, &form, buyer_id, Utc::now())
        .await
    {
        Ok(order) => order,
        Err(CheckoutError::Repository(err)) => return Err(AppError::Database(err)),
        Err(CheckoutError::EmptyCart) => return Ok(Redirect::to("/cart").into_response()),
        Err(err) => {
            tracing::info!(error = %err, "checkout rejected");
            if form.payment_method.is_empty() {
                form.payment_method = PaymentMethod::default().id().to_string();
            }
            let message = err.user_message();
            let status = AppError::Checkout(err).status();
            let page = CheckoutTemplate {
                layout: Layout::load(&state, &session, "cart").await,
                form,
                payment_methods: PaymentMethod::ALL,
                error: Some(message),
            };
            return Ok((status, page).into_response());
        }
    };

    session.insert(keys::LAST_ORDER, &order).await?;
    dispatch_cart(&session, [CartAction::ClearCart, CartAction::CloseCart]).await?;
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order", order.order_number.as_str())]),
    );

    if let Some(user_id) = buyer_id {
        state.leaderboard().invalidate().await;
        match AuthService::new(state.users(), state.purchases())
            .profile(user_id)
            .await
        {
            Ok(profile) => refresh_user(&session, profile).await?,
            Err(err) => tracing::warn!(error = %err, "could not refresh profile after checkout"),
        }
    }

    Ok(Redirect::to("/checkout/success").into_response())
}

/// Order confirmation page.
#[instrument(skip(state, session))]
pub async fn success(State(state): State<AppState>, session: Session) -> Response {
    let Some(order) = last_order(&session).await else {
        return Redirect::to("/").into_response();
    };

    CheckoutSuccessTemplate {
        layout: Layout::load(&state, &session, "cart").await,
        order,
    }
    .into_response()
}

/// Download the receipt for the last order as an HTML attachment.
///
/// # Errors
///
/// Returns 404 when the session holds no order.
#[instrument(skip(session))]
pub async fn receipt(session: Session) -> Result<Response, AppError> {
    let order = last_order(&session)
        .await
        .ok_or_else(|| AppError::NotFound("order".to_string()))?;

    let body = render_receipt(&order)?;
    let disposition = format!("attachment; filename=\"{}\"", receipt_filename(&order));

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
