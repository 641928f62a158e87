//! Data behind the admin panel.
//!
//! Orders, players and analytics are fixed sample data; the panel is a
//! presentation layer with search and filters over them. Products are
//! editable, but only in process memory: edits vanish on restart.

use std::sync::atomic::{AtomicI32, Ordering};

use chrono::{Days, Months, NaiveDate};
use thiserror::Error;
use tokio::sync::RwLock;

use frost_core::{Category, Price, ProductId};

// =============================================================================
// Orders
// =============================================================================

/// Order state as shown in the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Completed,
    Pending,
    Failed,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [Self; 4] = [Self::Completed, Self::Pending, Self::Failed, Self::Refunded];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub title: &'static str,
    pub category: Category,
    pub price: Price,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOrder {
    pub id: u32,
    pub order_number: &'static str,
    pub customer_email: &'static str,
    pub minecraft_username: &'static str,
    pub date: NaiveDate,
    pub items: Vec<OrderLine>,
    pub total: Price,
    pub status: OrderStatus,
    pub payment_method: &'static str,
}

/// Order date window, relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateFilter {
    /// Parse a query value; anything unknown means no filter.
    #[must_use]
    pub fn from_query(value: &str) -> Self {
        match value {
            "today" => Self::Today,
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::All,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Earliest order date kept, or `None` for no lower bound.
    #[must_use]
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::All => None,
            Self::Today => Some(today),
            Self::Week => today.checked_sub_days(Days::new(7)),
            Self::Month => today.checked_sub_months(Months::new(1)),
        }
    }
}

/// Orders page filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub search: String,
    /// `None` shows every status.
    pub status: Option<OrderStatus>,
    pub date: DateFilter,
}

impl OrderFilter {
    /// Build from raw query values (`all` or unknown means unfiltered).
    #[must_use]
    pub fn from_query(search: &str, status: &str, date: &str) -> Self {
        Self {
            search: search.trim().to_string(),
            status: OrderStatus::ALL.into_iter().find(|s| s.as_str() == status),
            date: DateFilter::from_query(date),
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Apply search, status and date filters.
#[must_use]
pub fn filter_orders<'a>(
    orders: &'a [AdminOrder],
    filter: &OrderFilter,
    today: NaiveDate,
) -> Vec<&'a AdminOrder> {
    let needle = filter.search.to_lowercase();
    let cutoff = filter.date.cutoff(today);

    orders
        .iter()
        .filter(|o| {
            needle.is_empty()
                || contains_ci(o.order_number, &needle)
                || contains_ci(o.customer_email, &needle)
                || contains_ci(o.minecraft_username, &needle)
        })
        .filter(|o| filter.status.is_none_or(|status| o.status == status))
        .filter(|o| cutoff.is_none_or(|cutoff| o.date >= cutoff))
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn order_lines(lines: &[(&'static str, Category, i64, u32)]) -> Vec<OrderLine> {
    lines
        .iter()
        .map(|&(title, category, cents, quantity)| OrderLine {
            title,
            category,
            price: Price::from_cents(cents),
            quantity,
        })
        .collect()
}

/// Sample orders.
#[must_use]
pub fn sample_orders() -> Vec<AdminOrder> {
    vec![
        AdminOrder {
            id: 1,
            order_number: "MC-789123",
            customer_email: "player1@example.com",
            minecraft_username: "CraftMaster2024",
            date: date(2024, 12, 20),
            items: order_lines(&[
                ("Diamond Rank", Category::Rank, 4999, 1),
                ("Legendary Crate Key", Category::Key, 2499, 2),
            ]),
            total: Price::from_cents(9997),
            status: OrderStatus::Completed,
            payment_method: "PayPal",
        },
        AdminOrder {
            id: 2,
            order_number: "MC-456789",
            customer_email: "player2@example.com",
            minecraft_username: "BlockBuilder",
            date: date(2024, 12, 19),
            items: order_lines(&[("Premium Unban", Category::Unban, 1999, 1)]),
            total: Price::from_cents(1999),
            status: OrderStatus::Pending,
            payment_method: "Credit Card",
        },
        AdminOrder {
            id: 3,
            order_number: "MC-123456",
            customer_email: "player3@example.com",
            minecraft_username: "EnderSlayer",
            date: date(2024, 12, 18),
            items: order_lines(&[
                ("Elite Rank", Category::Rank, 3499, 1),
                ("Epic Crate Key", Category::Key, 1499, 3),
            ]),
            total: Price::from_cents(7996),
            status: OrderStatus::Completed,
            payment_method: "GCash",
        },
        AdminOrder {
            id: 4,
            order_number: "MC-987654",
            customer_email: "player4@example.com",
            minecraft_username: "RedstoneWiz",
            date: date(2024, 12, 17),
            items: order_lines(&[("Mythic Crate Key", Category::Key, 3999, 1)]),
            total: Price::from_cents(3999),
            status: OrderStatus::Failed,
            payment_method: "Apple Pay",
        },
    ]
}

/// Headline numbers above the orders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStats {
    pub total_orders: usize,
    pub completed: usize,
    pub pending: usize,
    /// Revenue from completed orders.
    pub revenue: Price,
}

#[must_use]
pub fn order_stats(orders: &[AdminOrder]) -> OrderStats {
    let completed: Vec<&AdminOrder> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .collect();
    OrderStats {
        total_orders: orders.len(),
        completed: completed.len(),
        pending: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count(),
        revenue: completed.iter().map(|o| o.total).sum(),
    }
}

// =============================================================================
// Players
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerStatus {
    Active,
    Inactive,
    Banned,
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Banned => "banned",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPlayer {
    pub id: u32,
    pub minecraft_username: &'static str,
    pub email: &'static str,
    pub discord_tag: Option<&'static str>,
    pub join_date: NaiveDate,
    pub current_rank: &'static str,
    pub total_spent: Price,
    pub total_orders: u32,
    /// `None` for players who never bought anything.
    pub last_purchase: Option<NaiveDate>,
    pub status: PlayerStatus,
}

/// Sample players.
#[must_use]
pub fn sample_players() -> Vec<AdminPlayer> {
    vec![
        AdminPlayer {
            id: 1,
            minecraft_username: "CraftMaster2024",
            email: "player1@example.com",
            discord_tag: Some("CraftMaster#1234"),
            join_date: date(2024, 1, 15),
            current_rank: "Diamond",
            total_spent: Price::from_cents(12796),
            total_orders: 3,
            last_purchase: Some(date(2024, 12, 20)),
            status: PlayerStatus::Active,
        },
        AdminPlayer {
            id: 2,
            minecraft_username: "BlockBuilder",
            email: "player2@example.com",
            discord_tag: None,
            join_date: date(2024, 2, 10),
            current_rank: "Premium",
            total_spent: Price::from_cents(8997),
            total_orders: 2,
            last_purchase: Some(date(2024, 12, 18)),
            status: PlayerStatus::Active,
        },
        AdminPlayer {
            id: 3,
            minecraft_username: "EnderSlayer",
            email: "player3@example.com",
            discord_tag: Some("EnderSlayer#5678"),
            join_date: date(2024, 3, 5),
            current_rank: "Elite",
            total_spent: Price::from_cents(23495),
            total_orders: 5,
            last_purchase: Some(date(2024, 12, 19)),
            status: PlayerStatus::Active,
        },
        AdminPlayer {
            id: 4,
            minecraft_username: "RedstoneWiz",
            email: "player4@example.com",
            discord_tag: None,
            join_date: date(2024, 4, 20),
            current_rank: "VIP",
            total_spent: Price::from_cents(4598),
            total_orders: 1,
            last_purchase: Some(date(2024, 11, 15)),
            status: PlayerStatus::Inactive,
        },
        AdminPlayer {
            id: 5,
            minecraft_username: "GrieferKid",
            email: "player5@example.com",
            discord_tag: None,
            join_date: date(2024, 5, 12),
            current_rank: "Member",
            total_spent: Price::ZERO,
            total_orders: 0,
            last_purchase: None,
            status: PlayerStatus::Banned,
        },
    ]
}

/// Case-insensitive search over username, email and rank.
#[must_use]
pub fn filter_players<'a>(players: &'a [AdminPlayer], search: &str) -> Vec<&'a AdminPlayer> {
    let needle = search.trim().to_lowercase();
    players
        .iter()
        .filter(|p| {
            needle.is_empty()
                || contains_ci(p.minecraft_username, &needle)
                || contains_ci(p.email, &needle)
                || contains_ci(p.current_rank, &needle)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub total_players: usize,
    pub active_players: usize,
    pub total_revenue: Price,
    pub total_orders: u32,
}

#[must_use]
pub fn player_stats(players: &[AdminPlayer]) -> PlayerStats {
    PlayerStats {
        total_players: players.len(),
        active_players: players
            .iter()
            .filter(|p| p.status == PlayerStatus::Active)
            .count(),
        total_revenue: players.iter().map(|p| p.total_spent).sum(),
        total_orders: players.iter().map(|p| p.total_orders).sum(),
    }
}

// =============================================================================
// Products
// =============================================================================

/// Image used when a product is saved without one.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

/// A product as managed from the admin panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminProduct {
    pub id: ProductId,
    pub title: String,
    pub category: Category,
    pub price: Price,
    pub original_price: Option<Price>,
    pub description: String,
    pub image: String,
    pub featured: bool,
    pub visible: bool,
    /// Server console commands run on delivery; `{player}` is substituted.
    pub commands: Vec<String>,
    pub sales: u32,
}

impl AdminProduct {
    /// Commands joined back into textarea form.
    #[must_use]
    pub fn commands_text(&self) -> String {
        self.commands.join("\n")
    }
}

/// Raw product form input.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub original_price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub commands: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductFormError {
    #[error("title is required")]
    MissingTitle,
    #[error("invalid category")]
    InvalidCategory,
    #[error("price must be a positive amount")]
    InvalidPrice,
    #[error("original price must be a positive amount")]
    InvalidOriginalPrice,
}

impl ProductFormError {
    /// Short code carried in `?error=` redirects.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingTitle => "missing_title",
            Self::InvalidCategory => "invalid_category",
            Self::InvalidPrice => "invalid_price",
            Self::InvalidOriginalPrice => "invalid_original_price",
        }
    }
}

/// Validated product form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub title: String,
    pub category: Category,
    pub price: Price,
    pub original_price: Option<Price>,
    pub description: String,
    pub image: String,
    pub commands: Vec<String>,
}

fn positive_price(raw: &str) -> Option<Price> {
    raw.parse::<Price>().ok().filter(|p| *p > Price::ZERO)
}

/// One command per line; blank lines are dropped.
#[must_use]
pub fn parse_commands(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

impl TryFrom<&ProductForm> for ProductDraft {
    type Error = ProductFormError;

    fn try_from(form: &ProductForm) -> Result<Self, Self::Error> {
        let title = form.title.trim();
        if title.is_empty() {
            return Err(ProductFormError::MissingTitle);
        }
        let category = form
            .category
            .trim()
            .parse::<Category>()
            .map_err(|_| ProductFormError::InvalidCategory)?;
        let price = positive_price(&form.price).ok_or(ProductFormError::InvalidPrice)?;
        let original_price = match form.original_price.trim() {
            "" => None,
            raw => Some(positive_price(raw).ok_or(ProductFormError::InvalidOriginalPrice)?),
        };
        let image = match form.image.trim() {
            "" => PLACEHOLDER_IMAGE.to_string(),
            raw => raw.to_string(),
        };

        Ok(Self {
            title: title.to_string(),
            category,
            price,
            original_price,
            description: form.description.trim().to_string(),
            image,
            commands: parse_commands(&form.commands),
        })
    }
}

/// In-process product list behind the admin products page.
pub struct ProductBoard {
    products: RwLock<Vec<AdminProduct>>,
    next_id: AtomicI32,
}

impl Default for ProductBoard {
    fn default() -> Self {
        Self::with_products(sample_products())
    }
}

impl ProductBoard {
    #[must_use]
    pub fn with_products(products: Vec<AdminProduct>) -> Self {
        let next_id = products.iter().map(|p| p.id.as_i32()).max().unwrap_or(0) + 1;
        Self {
            products: RwLock::new(products),
            next_id: AtomicI32::new(next_id),
        }
    }

    pub async fn list(&self) -> Vec<AdminProduct> {
        self.products.read().await.clone()
    }

    pub async fn get(&self, id: ProductId) -> Option<AdminProduct> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Add a product. New products are visible, not featured, with no sales.
    pub async fn create(&self, draft: ProductDraft) -> AdminProduct {
        let product = AdminProduct {
            id: ProductId::new(self.next_id.fetch_add(1, Ordering::Relaxed)),
            title: draft.title,
            category: draft.category,
            price: draft.price,
            original_price: draft.original_price,
            description: draft.description,
            image: draft.image,
            featured: false,
            visible: true,
            commands: draft.commands,
            sales: 0,
        };
        self.products.write().await.push(product.clone());
        product
    }

    /// Replace the editable fields, keeping flags and sales. Returns `None`
    /// for an unknown id.
    pub async fn update(&self, id: ProductId, draft: ProductDraft) -> Option<AdminProduct> {
        let mut products = self.products.write().await;
        let product = products.iter_mut().find(|p| p.id == id)?;
        product.title = draft.title;
        product.category = draft.category;
        product.price = draft.price;
        product.original_price = draft.original_price;
        product.description = draft.description;
        product.image = draft.image;
        product.commands = draft.commands;
        Some(product.clone())
    }

    /// Flip the featured flag. Returns the new value.
    pub async fn toggle_featured(&self, id: ProductId) -> Option<bool> {
        let mut products = self.products.write().await;
        let product = products.iter_mut().find(|p| p.id == id)?;
        product.featured = !product.featured;
        Some(product.featured)
    }

    /// Flip the visibility flag. Returns the new value.
    pub async fn toggle_visible(&self, id: ProductId) -> Option<bool> {
        let mut products = self.products.write().await;
        let product = products.iter_mut().find(|p| p.id == id)?;
        product.visible = !product.visible;
        Some(product.visible)
    }

    /// Remove a product. Returns whether anything was removed.
    pub async fn delete(&self, id: ProductId) -> bool {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        products.len() != before
    }
}

/// Sample products.
#[must_use]
pub fn sample_products() -> Vec<AdminProduct> {
    vec![
        AdminProduct {
            id: ProductId::new(1),
            title: "Diamond Rank".to_string(),
            category: Category::Rank,
            price: Price::from_cents(4999),
            original_price: Some(Price::from_cents(6999)),
            description: "Top-tier rank with god mode, unlimited homes, and diamond exclusive perks."
                .to_string(),
            image: "/static/images/minecraft-diamond-rank-badge.png".to_string(),
            featured: true,
            visible: true,
            commands: vec![
                "lp user {player} parent set diamond".to_string(),
                "give {player} diamond 64".to_string(),
            ],
            sales: 156,
        },
        AdminProduct {
            id: ProductId::new(2),
            title: "Legendary Crate Key".to_string(),
            category: Category::Key,
            price: Price::from_cents(2499),
            original_price: None,
            description: "Open legendary crates for the rarest items and mythic equipment."
                .to_string(),
            image: "/static/images/minecraft-legendary-crate-key.png".to_string(),
            featured: false,
            visible: true,
            commands: vec!["crates give {player} legendary 1".to_string()],
            sales: 89,
        },
        AdminProduct {
            id: ProductId::new(3),
            title: "Premium Unban".to_string(),
            category: Category::Unban,
            price: Price::from_cents(1999),
            original_price: None,
            description: "Fast-track unban service for moderate violations.".to_string(),
            image: "/static/images/minecraft-unban-service.png".to_string(),
            featured: false,
            visible: true,
            commands: vec![
                "unban {player}".to_string(),
                "tempban {player} 0s Unbanned via store".to_string(),
            ],
            sales: 67,
        },
    ]
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: &'static str,
    pub change: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenuePoint {
    pub month: &'static str,
    pub revenue: u32,
    pub orders: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopProduct {
    pub name: &'static str,
    pub sales: u32,
    pub revenue: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShare {
    pub name: &'static str,
    /// Percent of revenue.
    pub value: u32,
    pub color: &'static str,
}

pub const STAT_CARDS: [StatCard; 4] = [
    StatCard {
        label: "Total Revenue",
        value: "$42,847",
        change: "+12.5% from last month",
    },
    StatCard {
        label: "Total Orders",
        value: "1,247",
        change: "+8.2% from last month",
    },
    StatCard {
        label: "Active Players",
        value: "3,456",
        change: "+15.3% from last month",
    },
    StatCard {
        label: "Products Sold",
        value: "2,891",
        change: "+6.7% from last month",
    },
];

pub const REVENUE_BY_MONTH: [RevenuePoint; 6] = [
    RevenuePoint {
        month: "Jan",
        revenue: 4200,
        orders: 45,
    },
    RevenuePoint {
        month: "Feb",
        revenue: 5800,
        orders: 62,
    },
    RevenuePoint {
        month: "Mar",
        revenue: 7200,
        orders: 78,
    },
    RevenuePoint {
        month: "Apr",
        revenue: 6900,
        orders: 71,
    },
    RevenuePoint {
        month: "May",
        revenue: 8400,
        orders: 89,
    },
    RevenuePoint {
        month: "Jun",
        revenue: 9200,
        orders: 95,
    },
];

pub const TOP_PRODUCTS: [TopProduct; 4] = [
    TopProduct {
        name: "Diamond Rank",
        sales: 156,
        revenue: 7794,
        color: "#1e90ff",
    },
    TopProduct {
        name: "Legendary Keys",
        sales: 89,
        revenue: 2223,
        color: "#663399",
    },
    TopProduct {
        name: "Premium Unban",
        sales: 67,
        revenue: 1339,
        color: "#9b59b6",
    },
    TopProduct {
        name: "Elite Rank",
        sales: 45,
        revenue: 1575,
        color: "#00cfff",
    },
];

pub const CATEGORY_SHARE: [CategoryShare; 3] = [
    CategoryShare {
        name: "Ranks",
        value: 65,
        color: "#1e90ff",
    },
    CategoryShare {
        name: "Keys",
        value: 25,
        color: "#663399",
    },
    CategoryShare {
        name: "Unbans",
        value: 10,
        color: "#9b59b6",
    },
];

/// Bar height for a month, as a percentage of the best month.
#[must_use]
pub fn revenue_bar_percent(point: &RevenuePoint) -> u32 {
    let max = REVENUE_BY_MONTH
        .iter()
        .map(|p| p.revenue)
        .max()
        .unwrap_or(1)
        .max(1);
    point.revenue.saturating_mul(100) / max
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn ids(orders: &[&AdminOrder]) -> Vec<u32> {
        orders.iter().map(|o| o.id).collect()
    }

    #[test]
    fn test_order_search_is_case_insensitive() {
        let orders = sample_orders();
        let today = date(2024, 12, 21);

        let filter = OrderFilter::from_query("enderslayer", "all", "all");
        assert_eq!(ids(&filter_orders(&orders, &filter, today)), vec![3]);

        let filter = OrderFilter::from_query("mc-98", "all", "all");
        assert_eq!(ids(&filter_orders(&orders, &filter, today)), vec![4]);

        let filter = OrderFilter::from_query("PLAYER2@", "", "");
        assert_eq!(ids(&filter_orders(&orders, &filter, today)), vec![2]);
    }

    #[test]
    fn test_order_status_filter() {
        let orders = sample_orders();
        let today = date(2024, 12, 21);
        let filter = OrderFilter::from_query("", "completed", "all");
        assert_eq!(ids(&filter_orders(&orders, &filter, today)), vec![1, 3]);

        let filter = OrderFilter::from_query("", "refunded", "all");
        assert!(filter_orders(&orders, &filter, today).is_empty());
    }

    #[test]
    fn test_order_date_filter() {
        let orders = sample_orders();
        let filter = OrderFilter::from_query("", "all", "today");
        assert_eq!(
            ids(&filter_orders(&orders, &filter, date(2024, 12, 20))),
            vec![1]
        );

        let filter = OrderFilter::from_query("", "all", "week");
        assert_eq!(
            ids(&filter_orders(&orders, &filter, date(2024, 12, 25))),
            vec![1, 2, 3]
        );

        let filter = OrderFilter::from_query("", "all", "month");
        assert_eq!(
            ids(&filter_orders(&orders, &filter, date(2025, 1, 18))),
            vec![1, 2, 3]
        );
        assert!(filter_orders(&orders, &filter, date(2025, 3, 1)).is_empty());
    }

    #[test]
    fn test_order_stats() {
        let stats = order_stats(&sample_orders());
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.revenue, Price::from_cents(9997 + 7996));
    }

    #[test]
    fn test_player_search_covers_rank() {
        let players = sample_players();
        let found = filter_players(&players, "diamond");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].minecraft_username, "CraftMaster2024");
        assert_eq!(filter_players(&players, "  ").len(), 5);
        assert_eq!(filter_players(&players, "EXAMPLE.COM").len(), 5);
    }

    #[test]
    fn test_player_stats() {
        let stats = player_stats(&sample_players());
        assert_eq!(stats.total_players, 5);
        assert_eq!(stats.active_players, 3);
        assert_eq!(stats.total_orders, 11);
        assert_eq!(stats.total_revenue, Price::from_cents(49886));
    }

    #[test]
    fn test_parse_commands_drops_blank_lines() {
        let commands = parse_commands("say hi {player}\r\n\r\n   \ngive {player} apple 1\n");
        assert_eq!(commands, vec!["say hi {player}", "give {player} apple 1"]);
    }

    #[test]
    fn test_product_form_validation() {
        let form = ProductForm {
            title: "Netherite Rank".to_string(),
            category: "rank".to_string(),
            price: "59.99".to_string(),
            original_price: String::new(),
            description: "Shiny".to_string(),
            image: String::new(),
            commands: "lp user {player} parent set netherite".to_string(),
        };
        let draft = ProductDraft::try_from(&form).unwrap();
        assert_eq!(draft.price, Price::from_cents(5999));
        assert_eq!(draft.image, PLACEHOLDER_IMAGE);
        assert_eq!(draft.original_price, None);

        let bad = ProductForm {
            title: " ".to_string(),
            ..form.clone()
        };
        assert_eq!(
            ProductDraft::try_from(&bad),
            Err(ProductFormError::MissingTitle)
        );
        let bad = ProductForm {
            price: "free".to_string(),
            ..form.clone()
        };
        assert_eq!(
            ProductDraft::try_from(&bad),
            Err(ProductFormError::InvalidPrice)
        );
        let bad = ProductForm {
            category: "pet".to_string(),
            ..form.clone()
        };
        assert_eq!(
            ProductDraft::try_from(&bad),
            Err(ProductFormError::InvalidCategory)
        );
        let bad = ProductForm {
            original_price: "-5".to_string(),
            ..form
        };
        assert_eq!(
            ProductDraft::try_from(&bad),
            Err(ProductFormError::InvalidOriginalPrice)
        );
    }

    fn draft(title: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            category: Category::Key,
            price: Price::from_cents(500),
            original_price: None,
            description: String::new(),
            image: PLACEHOLDER_IMAGE.to_string(),
            commands: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_product_board_lifecycle() {
        let board = ProductBoard::default();
        assert_eq!(board.list().await.len(), 3);

        let created = board.create(draft("Vote Key")).await;
        assert_eq!(created.id, ProductId::new(4));
        assert!(created.visible);
        assert!(!created.featured);

        let updated = board.update(created.id, draft("Vote Key+")).await.unwrap();
        assert_eq!(updated.title, "Vote Key+");

        assert_eq!(board.toggle_featured(created.id).await, Some(true));
        assert_eq!(board.toggle_visible(created.id).await, Some(false));
        assert_eq!(board.toggle_visible(ProductId::new(99)).await, None);

        assert!(board.delete(created.id).await);
        assert!(!board.delete(created.id).await);
        assert!(board.get(created.id).await.is_none());
        assert_eq!(board.list().await.len(), 3);
    }

    #[tokio::test]
    async fn test_update_keeps_sales_and_flags() {
        let board = ProductBoard::default();
        let updated = board
            .update(ProductId::new(1), draft("Diamond Rank II"))
            .await
            .unwrap();
        assert_eq!(updated.sales, 156);
        assert!(updated.featured);
        assert_eq!(updated.commands, Vec::<String>::new());
    }

    #[test]
    fn test_revenue_bar_percent() {
        assert_eq!(revenue_bar_percent(&REVENUE_BY_MONTH[5]), 100);
        assert_eq!(revenue_bar_percent(&REVENUE_BY_MONTH[0]), 45);
    }
}
