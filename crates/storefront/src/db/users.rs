//! `PostgreSQL` account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use frost_core::{Email, MinecraftUsername, UserId, UserRole};

use super::{RepositoryError, UserStore, conflict_on_unique};
use crate::models::{Account, AccountChanges, NewAccount};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, minecraft_username, discord_tag, role, \
                               created_at, updated_at";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    email: String,
    password_hash: String,
    minecraft_username: String,
    discord_tag: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let minecraft_username = MinecraftUsername::parse(&row.minecraft_username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let role = row
            .role
            .parse::<UserRole>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            password_hash: row.password_hash,
            minecraft_username,
            discord_tag: row.discord_tag,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Account repository backed by `storefront.user`.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let row: AccountRow = sqlx::query_as(&format!(
            "INSERT INTO storefront.user (email, password_hash, minecraft_username) \
             VALUES ($1, $2, $3) \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.minecraft_username.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        row.try_into()
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM storefront.user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM storefront.user WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        changes: AccountChanges,
    ) -> Result<Account, RepositoryError> {
        let username = changes
            .minecraft_username
            .as_ref()
            .map(MinecraftUsername::as_str);
        // $4 distinguishes "leave discord_tag alone" from "set it to NULL".
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "UPDATE storefront.user SET \
                 email = COALESCE($2, email), \
                 minecraft_username = COALESCE($3, minecraft_username), \
                 discord_tag = CASE WHEN $4 THEN $5 ELSE discord_tag END, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(username)
        .bind(changes.discord_tag.is_some())
        .bind(changes.discord_tag.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    async fn set_role(&self, email: &Email, role: UserRole) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE storefront.user SET role = $2, updated_at = NOW() WHERE email = $1",
        )
        .bind(email.as_str())
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
