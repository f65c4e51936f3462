//! User store adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{CoreError, CoreResult, UserId};
use domain_account::ports::{NewUser, UserStore, UserUpdate};
use domain_account::User;

use crate::error::map_db_error;

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    credential_ref: String,
    subscription_expiry: Option<DateTime<Utc>>,
    has_paid: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::from(row.id),
            name: row.name,
            email: row.email,
            credential_ref: row.credential_ref,
            subscription_expiry: row.subscription_expiry,
            has_paid: row.has_paid,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, credential_ref, subscription_expiry, has_paid, created_at";

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, id: UserId) -> CoreResult<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("User", e))?
            .map(User::from)
            .ok_or_else(|| CoreError::not_found("User", id))
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("User", e))?
            .map(User::from))
    }

    async fn create(&self, new_user: NewUser, now: DateTime<Utc>) -> CoreResult<User> {
        let user = User::new(
            UserId::new_v7(),
            new_user.name,
            new_user.email,
            new_user.credential_ref,
            now,
        );
        sqlx::query(
            "INSERT INTO users (id, name, email, credential_ref, subscription_expiry, has_paid, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(Uuid::from(user.id))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.credential_ref)
        .bind(user.subscription_expiry)
        .bind(user.has_paid)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("User", e))?;
        Ok(user)
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> CoreResult<User> {
        let query = format!(
            "UPDATE users SET
                subscription_expiry = COALESCE($2, subscription_expiry),
                has_paid = COALESCE($3, has_paid)
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(Uuid::from(id))
            .bind(update.subscription_expiry)
            .bind(update.has_paid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("User", e))?
            .map(User::from)
            .ok_or_else(|| CoreError::not_found("User", id))
    }
}
