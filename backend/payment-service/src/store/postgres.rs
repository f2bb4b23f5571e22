use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::store::{PaymentStore, ReconciledPayment, StoreError};

/// Advisory lock key for the reconciliation singleton. Postgres advisory
/// locks are session-scoped, so the connection that took the lock is kept
/// aside until `unlock`.
const RECONCILE_LOCK_KEY: i64 = 0x7468_6165_6461_6c01;

pub struct PgPaymentStore {
    pool: PgPool,
    lock_conn: Mutex<Option<PoolConnection<Postgres>>>,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_conn: Mutex::new(None),
        }
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn try_lock(&self) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let locked: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
            .bind(RECONCILE_LOCK_KEY)
            .fetch_one(&mut *conn)
            .await?;

        if locked {
            *self.lock_conn.lock().await = Some(conn);
        }
        Ok(locked)
    }

    async fn unlock(&self) -> Result<(), StoreError> {
        if let Some(mut conn) = self.lock_conn.lock().await.take() {
            sqlx::query_scalar::<_, bool>("SELECT pg_advisory_unlock($1)")
                .bind(RECONCILE_LOCK_KEY)
                .fetch_one(&mut *conn)
                .await?;
        }
        Ok(())
    }

    async fn find_user_by_phone_suffix(&self, suffix: &str) -> Result<Option<Uuid>, StoreError> {
        // First match wins; created_at order keeps reruns deterministic when
        // digit suffixes collide across users.
        let user_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM users
            WHERE phone_number LIKE '%' || $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(suffix)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<Uuid>, StoreError> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM users WHERE email = $1 ORDER BY created_at LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id)
    }

    async fn payment_exists(&self, order_id: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM payments WHERE order_id = $1)")
                .bind(order_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn mark_payment_captured(&self, payment: &ReconciledPayment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE payments
            SET gateway_order_id = $2,
                gateway_payment_id = $3,
                method = $4,
                status = 'success',
                paid_at = $5,
                updated_at = NOW()
            WHERE order_id = $1
            "#,
        )
        .bind(&payment.order_id)
        .bind(&payment.gateway_order_id)
        .bind(&payment.gateway_payment_id)
        .bind(&payment.method)
        .bind(payment.paid_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_backfilled_payment(
        &self,
        payment: &ReconciledPayment,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO payments
                (user_id, order_id, gateway_order_id, gateway_payment_id,
                 amount, currency, method, status, paid_at, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'success', $8, $9)
            "#,
        )
        .bind(payment.user_id)
        .bind(&payment.order_id)
        .bind(&payment.gateway_order_id)
        .bind(&payment.gateway_payment_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.method)
        .bind(payment.paid_at)
        .bind(serde_json::json!({ "backfilled": true }))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
