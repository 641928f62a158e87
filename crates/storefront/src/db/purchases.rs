//! `PostgreSQL` purchase repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use frost_core::{
    OrderNumber, Price, Purchase, PurchaseId, PurchaseItem, PurchaseStatus, SpenderTotals, UserId,
};

use super::{NewPurchase, PurchaseStore, RepositoryError};

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    id: i32,
    order_number: String,
    items: Json<Vec<PurchaseItem>>,
    amount: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = RepositoryError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<PurchaseStatus>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: PurchaseId::new(row.id),
            date: row.created_at,
            items: row.items.0,
            total: Price::new(row.amount),
            status,
            order_number: OrderNumber::from_stored(row.order_number),
        })
    }
}

#[derive(sqlx::FromRow)]
struct SpenderRow {
    id: i32,
    minecraft_username: String,
    total_spent: Decimal,
    total_purchases: i64,
}

/// Purchase repository backed by `storefront.purchase`.
#[derive(Clone)]
pub struct PgPurchaseStore {
    pool: PgPool,
}

impl PgPurchaseStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseStore for PgPurchaseStore {
    async fn record(&self, purchase: NewPurchase) -> Result<Purchase, RepositoryError> {
        let row: PurchaseRow = sqlx::query_as(
            "INSERT INTO storefront.purchase \
                 (user_id, order_number, items, amount, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, order_number, items, amount, status, created_at",
        )
        .bind(purchase.user_id.as_i32())
        .bind(purchase.order_number.as_str())
        .bind(Json(&purchase.items))
        .bind(purchase.total.amount())
        .bind(purchase.status.as_str())
        .bind(purchase.created_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Purchase>, RepositoryError> {
        let rows: Vec<PurchaseRow> = sqlx::query_as(
            "SELECT id, order_number, items, amount, status, created_at \
             FROM storefront.purchase \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Purchase::try_from).collect()
    }

    async fn top_spenders(&self, limit: usize) -> Result<Vec<SpenderTotals>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<SpenderRow> = sqlx::query_as(
            "SELECT u.id, u.minecraft_username, \
                    COALESCE(SUM(p.amount), 0) AS total_spent, \
                    COUNT(p.id) AS total_purchases \
             FROM storefront.user u \
             LEFT JOIN storefront.purchase p \
                 ON p.user_id = u.id AND p.status = 'completed' \
             GROUP BY u.id, u.minecraft_username \
             HAVING COALESCE(SUM(p.amount), 0) > 0 \
             ORDER BY total_spent DESC, u.id ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SpenderTotals {
                user_id: UserId::new(row.id),
                minecraft_username: row.minecraft_username,
                total_spent: Price::new(row.total_spent),
                total_purchases: u32::try_from(row.total_purchases).unwrap_or(u32::MAX),
            })
            .collect())
    }
}
