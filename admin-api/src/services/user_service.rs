// User service - app-user queries and block/unblock operations
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};

pub struct UserService {
    db: Database,
}

/// App user row as exposed to the admin surface.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub status: String,
    pub device_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub page: u32,
    pub limit: u32,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List users with pagination, optional status filter and a free-text
    /// search over name, email and phone number.
    pub async fn list_users(&self, params: ListUsersParams) -> Result<(Vec<User>, i64)> {
        let offset = ((params.page - 1) * params.limit) as i64;
        let limit = params.limit as i64;

        let users: Vec<User> = sqlx::query_as(
            r#"
            SELECT *
            FROM users
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL
                   OR name ILIKE '%' || $2 || '%'
                   OR email ILIKE '%' || $2 || '%'
                   OR phone_number LIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&params.status)
        .bind(&params.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db.pg)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL
                   OR name ILIKE '%' || $2 || '%'
                   OR email ILIKE '%' || $2 || '%'
                   OR phone_number LIKE '%' || $2 || '%')
            "#,
        )
        .bind(&params.status)
        .bind(&params.search)
        .fetch_one(&self.db.pg)
        .await?;

        Ok((users, total))
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        let user: User = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db.pg)
            .await?
            .ok_or(AppError::NotFound(format!("User {} not found", user_id)))?;

        Ok(user)
    }

    /// Block a user. Blocked users lose app access but keep their data.
    pub async fn block_user(&self, user_id: Uuid) -> Result<()> {
        self.set_status(user_id, "blocked").await
    }

    pub async fn unblock_user(&self, user_id: Uuid) -> Result<()> {
        self.set_status(user_id, "active").await
    }

    async fn set_status(&self, user_id: Uuid, status: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(status)
            .execute(&self.db.pg)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        Ok(())
    }
}
