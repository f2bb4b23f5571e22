// Billing service - read-only views over subscriptions and payments
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};

pub struct BillingService {
    db: Database,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_code: String,
    pub status: String,
    pub gateway_subscription_id: Option<String>,
    pub autopay: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_id: String,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub method: Option<String>,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListBillingParams {
    pub page: u32,
    pub limit: u32,
    pub status: Option<String>,
    pub user_id: Option<Uuid>,
}

impl BillingService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_subscriptions(
        &self,
        params: ListBillingParams,
    ) -> Result<(Vec<Subscription>, i64)> {
        let offset = ((params.page - 1) * params.limit) as i64;
        let limit = params.limit as i64;

        let subscriptions: Vec<Subscription> = sqlx::query_as(
            r#"
            SELECT *
            FROM subscriptions
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&params.status)
        .bind(params.user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db.pg)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM subscriptions
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            "#,
        )
        .bind(&params.status)
        .bind(params.user_id)
        .fetch_one(&self.db.pg)
        .await?;

        Ok((subscriptions, total))
    }

    pub async fn get_subscription(&self, id: Uuid) -> Result<Subscription> {
        let subscription: Subscription =
            sqlx::query_as("SELECT * FROM subscriptions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db.pg)
                .await?
                .ok_or(AppError::NotFound(format!("Subscription {} not found", id)))?;

        Ok(subscription)
    }

    pub async fn list_payments(&self, params: ListBillingParams) -> Result<(Vec<Payment>, i64)> {
        let offset = ((params.page - 1) * params.limit) as i64;
        let limit = params.limit as i64;

        let payments: Vec<Payment> = sqlx::query_as(
            r#"
            SELECT *
            FROM payments
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&params.status)
        .bind(params.user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db.pg)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM payments
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            "#,
        )
        .bind(&params.status)
        .bind(params.user_id)
        .fetch_one(&self.db.pg)
        .await?;

        Ok((payments, total))
    }

    pub async fn get_payment(&self, id: Uuid) -> Result<Payment> {
        let payment: Payment = sqlx::query_as("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db.pg)
            .await?
            .ok_or(AppError::NotFound(format!("Payment {} not found", id)))?;

        Ok(payment)
    }
}
