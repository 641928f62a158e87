//! Cart route handlers.
//!
//! The cart lives in the session under [`keys::CART`] and changes only
//! through the cart reducer. Forms post back and redirect; HTMX requests
//! get the drawer fragment instead, with a `cart-updated` trigger.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use frost_core::{CartAction, CartState};

use crate::catalog;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::keys;
use crate::routes::layout::{Layout, local_redirect};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart from the session; empty when absent or unreadable.
pub async fn load_cart(session: &Session) -> CartState {
    session
        .get::<CartState>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Run `actions` through the cart reducer in order and store the result.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn dispatch_cart(
    session: &Session,
    actions: impl IntoIterator<Item = CartAction>,
) -> Result<CartState, tower_sessions::session::Error> {
    let cart = actions
        .into_iter()
        .fold(load_cart(session).await, CartState::reduce);
    session.insert(keys::CART, &cart).await?;
    Ok(cart)
}

/// Most units of one product a cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub next: Option<String>,
}

/// Update quantity form data. Zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
    pub next: Option<String>,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
    pub next: Option<String>,
}

/// Forms that only carry a return path.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartState,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Drawer fragment for HTMX callers, a redirect for plain forms.
fn respond(headers: &HeaderMap, cart: CartState, next: Option<&str>) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartDrawerTemplate { cart },
        )
            .into_response()
    } else {
        Redirect::to(local_redirect(next, "/cart")).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    CartShowTemplate {
        layout: Layout::load(&state, &session, "cart").await,
    }
}

/// Add one unit of a catalog product and open the drawer.
///
/// Buying requires an account, so signed-out visitors are sent to login.
/// A line already at [`MAX_LINE_QUANTITY`] is left unchanged.
#[instrument(skip(session, headers, user), fields(user_id = %user.id))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let product = catalog::find(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut actions = vec![CartAction::OpenCart];
    if load_cart(&session).await.quantity_of(&product.id) < MAX_LINE_QUANTITY {
        actions.insert(0, CartAction::AddItem(product.to_cart_item()));
    }
    let cart = dispatch_cart(&session, actions).await?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", product.id.as_str())]),
    );
    tracing::info!(product_id = %product.id, items = cart.item_count(), "added to cart");

    Ok(respond(&headers, cart, form.next.as_deref()))
}

/// Set a line's quantity, capped at [`MAX_LINE_QUANTITY`].
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, AppError> {
    let cart = dispatch_cart(
        &session,
        [CartAction::UpdateQuantity {
            id: form.id,
            quantity: form.quantity.min(i64::from(MAX_LINE_QUANTITY)),
        }],
    )
    .await?;
    Ok(respond(&headers, cart, form.next.as_deref()))
}

/// Remove a line.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    let cart = dispatch_cart(&session, [CartAction::RemoveItem(form.id)]).await?;
    Ok(respond(&headers, cart, form.next.as_deref()))
}

/// Empty the cart.
#[instrument(skip(session, headers))]
pub async fn clear(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ReturnForm>,
) -> Result<Response, AppError> {
    let cart = dispatch_cart(&session, [CartAction::ClearCart]).await?;
    Ok(respond(&headers, cart, form.next.as_deref()))
}

/// Show the drawer.
#[instrument(skip(session, headers))]
pub async fn open(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ReturnForm>,
) -> Result<Response, AppError> {
    let cart = dispatch_cart(&session, [CartAction::OpenCart]).await?;
    Ok(respond(&headers, cart, form.next.as_deref()))
}

/// Hide the drawer.
#[instrument(skip(session, headers))]
pub async fn close(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ReturnForm>,
) -> Result<Response, AppError> {
    let cart = dispatch_cart(&session, [CartAction::CloseCart]).await?;
    Ok(respond(&headers, cart, form.next.as_deref()))
}

/// Flip the drawer.
#[instrument(skip(session, headers))]
pub async fn toggle(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ReturnForm>,
) -> Result<Response, AppError> {
    let cart = dispatch_cart(&session, [CartAction::ToggleCart]).await?;
    Ok(respond(&headers, cart, form.next.as_deref()))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: load_cart(&session).await.item_count(),
    }
}
