pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

pub use postgres::PgPaymentStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A captured gateway payment resolved to a local user, ready to be written
/// into the `payments` table. `order_id` is the order receipt and the
/// table's natural unique key.
#[derive(Debug, Clone)]
pub struct ReconciledPayment {
    pub user_id: Uuid,
    pub order_id: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub method: Option<String>,
    pub paid_at: DateTime<Utc>,
}

/// Local persistence needed by the reconciliation job. The production
/// implementation is Postgres; tests substitute an in-memory store.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Try to take the singleton-run lock. `false` means another run holds
    /// it. The lock is held until `unlock`.
    async fn try_lock(&self) -> Result<bool, StoreError>;
    async fn unlock(&self) -> Result<(), StoreError>;

    /// First user whose phone number ends with the given digit suffix,
    /// in creation order.
    async fn find_user_by_phone_suffix(&self, suffix: &str) -> Result<Option<Uuid>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<Uuid>, StoreError>;

    async fn payment_exists(&self, order_id: &str) -> Result<bool, StoreError>;
    /// Update the existing row for this `order_id` with gateway ids, method,
    /// paid timestamp, and a `success` status.
    async fn mark_payment_captured(&self, payment: &ReconciledPayment) -> Result<(), StoreError>;
    /// Insert a new row for this `order_id`, tagged as backfilled.
    async fn insert_backfilled_payment(&self, payment: &ReconciledPayment)
        -> Result<(), StoreError>;
}
