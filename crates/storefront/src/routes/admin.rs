//! Admin panel route handlers.
//!
//! Every handler takes [`RequireAdmin`]. Orders, players and analytics are
//! fixed demo data; product edits live in the in-process [`ProductBoard`]
//! and are lost on restart.
//!
//! [`ProductBoard`]: crate::admin_data::ProductBoard

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use frost_core::{Category, ProductId};

use crate::admin_data::{
    self, AdminOrder, AdminPlayer, AdminProduct, CATEGORY_SHARE, CategoryShare, DateFilter,
    OrderFilter, OrderStats, OrderStatus, PlayerStats, ProductDraft, ProductForm,
    REVENUE_BY_MONTH, RevenuePoint, STAT_CARDS, StatCard, TOP_PRODUCTS, TopProduct,
};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::layout::Layout;
use crate::state::AppState;

/// One bar of the revenue chart with its precomputed height.
pub struct RevenueBar {
    pub point: RevenuePoint,
    pub percent: u32,
}

/// Analytics overview template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub layout: Layout,
    pub stat_cards: &'static [StatCard],
    pub revenue: Vec<RevenueBar>,
    pub top_products: &'static [TopProduct],
    pub categories: &'static [CategoryShare],
}

/// Orders table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct AdminOrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<AdminOrder>,
    pub stats: OrderStats,
    pub search: String,
    pub status: String,
    pub date: &'static str,
    pub statuses: [OrderStatus; 4],
    pub dates: [DateFilter; 4],
}

/// Players table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/players.html")]
pub struct AdminPlayersTemplate {
    pub layout: Layout,
    pub players: Vec<AdminPlayer>,
    pub stats: PlayerStats,
    pub search: String,
}

/// Product management template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct AdminProductsTemplate {
    pub layout: Layout,
    pub products: Vec<AdminProduct>,
    pub categories: [Category; 3],
    pub error: Option<&'static str>,
}

/// Single product edit form.
#[derive(Template, WebTemplate)]
#[template(path = "admin/product_edit.html")]
pub struct AdminProductEditTemplate {
    pub layout: Layout,
    pub product: AdminProduct,
    pub categories: [Category; 3],
    pub error: Option<&'static str>,
}

/// Order filter query.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date: String,
}

/// Search query shared by the players page.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

/// Error code carried back to the product pages.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

/// Inline message for a product form error code.
#[must_use]
pub fn product_error_message(code: &str) -> Option<&'static str> {
    match code {
        "missing_title" => Some("Product title is required."),
        "invalid_category" => Some("Choose a rank, key or unban category."),
        "invalid_price" => Some("Price must be a positive amount."),
        "invalid_original_price" => Some("Original price must be a positive amount."),
        "not_found" => Some("That product no longer exists."),
        _ => None,
    }
}

/// Analytics overview.
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
) -> AdminDashboardTemplate {
    let revenue = REVENUE_BY_MONTH
        .iter()
        .map(|point| RevenueBar {
            point: point.clone(),
            percent: admin_data::revenue_bar_percent(point),
        })
        .collect();

    AdminDashboardTemplate {
        layout: Layout::load(&state, &session, "admin").await,
        stat_cards: &STAT_CARDS,
        revenue,
        top_products: &TOP_PRODUCTS,
        categories: &CATEGORY_SHARE,
    }
}

/// Orders table with search, status and date filters.
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn orders(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<OrdersQuery>,
) -> AdminOrdersTemplate {
    let all = admin_data::sample_orders();
    let filter = OrderFilter::from_query(&query.search, &query.status, &query.date);
    let today = Utc::now().date_naive();
    let orders: Vec<AdminOrder> = admin_data::filter_orders(&all, &filter, today)
        .into_iter()
        .cloned()
        .collect();
    let stats = admin_data::order_stats(&orders);

    AdminOrdersTemplate {
        layout: Layout::load(&state, &session, "admin").await,
        orders,
        stats,
        status: filter
            .status
            .map_or_else(|| "all".to_string(), |s| s.as_str().to_string()),
        date: filter.date.as_str(),
        search: filter.search,
        statuses: OrderStatus::ALL,
        dates: [
            DateFilter::All,
            DateFilter::Today,
            DateFilter::Week,
            DateFilter::Month,
        ],
    }
}

/// Players table with search.
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn players(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<SearchQuery>,
) -> AdminPlayersTemplate {
    let all = admin_data::sample_players();
    let players = admin_data::filter_players(&all, &query.search)
        .into_iter()
        .cloned()
        .collect();

    AdminPlayersTemplate {
        layout: Layout::load(&state, &session, "admin").await,
        players,
        stats: admin_data::player_stats(&all),
        search: query.search.trim().to_string(),
    }
}

/// Product list with the create form.
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn products(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<ErrorQuery>,
) -> AdminProductsTemplate {
    AdminProductsTemplate {
        layout: Layout::load(&state, &session, "admin").await,
        products: state.products().list().await,
        categories: Category::ALL,
        error: query.error.as_deref().and_then(product_error_message),
    }
}

/// Create a product from the form.
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Redirect {
    match ProductDraft::try_from(&form) {
        Ok(draft) => {
            let product = state.products().create(draft).await;
            tracing::info!(product_id = %product.id, title = %product.title, "product created");
            Redirect::to("/admin/products")
        }
        Err(err) => {
            tracing::info!(error = %err, "product form rejected");
            Redirect::to(&format!("/admin/products?error={}", err.code()))
        }
    }
}

/// Edit form for one product.
#[instrument(skip_all, fields(admin = %admin.id, product_id = id))]
pub async fn edit_product(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    Query(query): Query<ErrorQuery>,
) -> Result<Response, AppError> {
    let product = state
        .products()
        .get(ProductId::new(id))
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(AdminProductEditTemplate {
        layout: Layout::load(&state, &session, "admin").await,
        product,
        categories: Category::ALL,
        error: query.error.as_deref().and_then(product_error_message),
    }
    .into_response())
}

/// Save edits to a product. Featured, visibility and sales are kept.
#[instrument(skip_all, fields(admin = %admin.id, product_id = id))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Redirect {
    let draft = match ProductDraft::try_from(&form) {
        Ok(draft) => draft,
        Err(err) => {
            tracing::info!(error = %err, "product form rejected");
            return Redirect::to(&format!("/admin/products/{id}/edit?error={}", err.code()));
        }
    };

    let updated = state.products().update(ProductId::new(id), draft).await;
    if updated.is_some() {
        tracing::info!("product updated");
        Redirect::to("/admin/products")
    } else {
        Redirect::to("/admin/products?error=not_found")
    }
}

/// Remove a product.
#[instrument(skip_all, fields(admin = %admin.id, product_id = id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Redirect {
    if state.products().delete(ProductId::new(id)).await {
        tracing::info!("product deleted");
        Redirect::to("/admin/products")
    } else {
        Redirect::to("/admin/products?error=not_found")
    }
}

/// Flip the featured flag.
#[instrument(skip_all, fields(admin = %admin.id, product_id = id))]
pub async fn toggle_featured(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Redirect {
    match state.products().toggle_featured(ProductId::new(id)).await {
        Some(featured) => {
            tracing::info!(featured, "product featured flag changed");
            Redirect::to("/admin/products")
        }
        None => Redirect::to("/admin/products?error=not_found"),
    }
}

/// Flip the visibility flag.
#[instrument(skip_all, fields(admin = %admin.id, product_id = id))]
pub async fn toggle_visibility(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Redirect {
    match state.products().toggle_visible(ProductId::new(id)).await {
        Some(visible) => {
            tracing::info!(visible, "product visibility changed");
            Redirect::to("/admin/products")
        }
        None => Redirect::to("/admin/products?error=not_found"),
    }
}
