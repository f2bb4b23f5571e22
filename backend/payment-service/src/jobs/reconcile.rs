//! Payment Reconciliation Job
//!
//! Backfills the local payments ledger from the gateway's captured-payment
//! history for a bounded window. Webhook ingestion is the primary path; this
//! job is the corrective one, so it must be safe to re-run over overlapping
//! windows: writes are keyed by the order receipt and an existing row is
//! updated in place, never duplicated.
//!
//! Per-item failures (order lookup, user resolution, row write) are logged
//! and counted as skips; only a failing list call or a held run lock aborts
//! the run.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::razorpay::{RazorpayClient, RazorpayError, RemotePayment};
use crate::store::{PaymentStore, ReconciledPayment, StoreError};

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("another reconciliation run holds the lock")]
    AlreadyRunning,

    #[error(transparent)]
    Gateway(#[from] RazorpayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Inclusive window start.
    pub from: DateTime<Utc>,
    /// Inclusive window end.
    pub to: DateTime<Utc>,
    pub page_size: u32,
    /// Orders whose receipt lacks this prefix belong to other gateway
    /// activity and are ignored.
    pub receipt_prefix: String,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            from: now - Duration::days(30),
            to: now,
            page_size: 100,
            receipt_prefix: "thaedal_".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
    /// Number of list-endpoint fetches issued.
    pub pages: u32,
}

impl std::fmt::Display for ReconcileSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} skipped ({} pages)",
            self.created, self.updated, self.skipped, self.pages
        )
    }
}

pub struct ReconcileJob<S> {
    gateway: RazorpayClient,
    store: S,
    options: ReconcileOptions,
}

impl<S: PaymentStore> ReconcileJob<S> {
    pub fn new(gateway: RazorpayClient, store: S, options: ReconcileOptions) -> Self {
        Self {
            gateway,
            store,
            options,
        }
    }

    /// Run the backfill to completion. Holds the singleton-run lock for the
    /// duration; a concurrent run fails fast with `AlreadyRunning`.
    pub async fn run(&self) -> Result<ReconcileSummary, ReconcileError> {
        if !self.store.try_lock().await? {
            return Err(ReconcileError::AlreadyRunning);
        }

        let result = self.run_locked().await;

        if let Err(e) = self.store.unlock().await {
            tracing::warn!(error = %e, "failed to release reconciliation lock");
        }

        result
    }

    async fn run_locked(&self) -> Result<ReconcileSummary, ReconcileError> {
        let mut summary = ReconcileSummary::default();
        let mut skip = 0u32;

        tracing::info!(
            from = %self.options.from,
            to = %self.options.to,
            page_size = self.options.page_size,
            "starting payment reconciliation"
        );

        loop {
            // A list failure here is unrecoverable and aborts the run.
            let page = self
                .gateway
                .list_payments(
                    self.options.from.timestamp(),
                    self.options.to.timestamp(),
                    self.options.page_size,
                    skip,
                )
                .await?;
            summary.pages += 1;

            if page.is_empty() {
                break;
            }
            let page_len = page.len();

            for payment in page {
                self.process_payment(payment, &mut summary).await;
            }

            // A short page is the last one; stopping here keeps a full
            // window at N*page_size payments to exactly N fetches.
            if (page_len as u32) < self.options.page_size {
                break;
            }
            skip += self.options.page_size;
        }

        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            pages = summary.pages,
            "payment reconciliation finished"
        );

        Ok(summary)
    }

    /// Handle one remote payment. Every failure path is converted into a
    /// skip so the loop always continues.
    async fn process_payment(&self, payment: RemotePayment, summary: &mut ReconcileSummary) {
        if !payment.is_captured() {
            return;
        }

        // Malformed entries are silently dropped.
        let (Some(payment_id), Some(order_id)) =
            (payment.id.clone(), payment.order_id.clone())
        else {
            return;
        };

        let order = match self.gateway.fetch_order(&order_id).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(%payment_id, %order_id, error = %e, "order lookup failed, skipping");
                summary.skipped += 1;
                return;
            }
        };

        // Not our order; other gateway activity shares the account.
        let Some(receipt) = order.receipt else {
            return;
        };
        if !receipt.starts_with(&self.options.receipt_prefix) {
            return;
        }

        let user_id = match self.resolve_user(&payment).await {
            Ok(Some(user_id)) => user_id,
            Ok(None) => {
                tracing::warn!(%payment_id, %receipt, "no local user matched, skipping");
                summary.skipped += 1;
                return;
            }
            Err(e) => {
                tracing::warn!(%payment_id, %receipt, error = %e, "user lookup failed, skipping");
                summary.skipped += 1;
                return;
            }
        };

        let record = ReconciledPayment {
            user_id,
            order_id: receipt.clone(),
            gateway_order_id: order.id,
            gateway_payment_id: payment_id.clone(),
            amount: minor_to_major(payment.amount),
            currency: payment.currency.clone(),
            method: payment.method.clone(),
            paid_at: Utc
                .timestamp_opt(payment.created_at, 0)
                .single()
                .unwrap_or_else(Utc::now),
        };

        let outcome = match self.store.payment_exists(&receipt).await {
            Ok(true) => self
                .store
                .mark_payment_captured(&record)
                .await
                .map(|_| &mut summary.updated),
            Ok(false) => self
                .store
                .insert_backfilled_payment(&record)
                .await
                .map(|_| &mut summary.created),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(counter) => *counter += 1,
            Err(e) => {
                tracing::warn!(%payment_id, %receipt, error = %e, "payment write failed, skipping");
                summary.skipped += 1;
            }
        }
    }

    /// Phone suffix first, exact email second, first match wins. The suffix
    /// match can collide across users with shared digit endings; that is a
    /// known data-quality risk carried over deliberately.
    async fn resolve_user(&self, payment: &RemotePayment) -> Result<Option<Uuid>, StoreError> {
        if let Some(contact) = payment.contact.as_deref() {
            if let Some(suffix) = phone_suffix(contact) {
                if let Some(user_id) = self.store.find_user_by_phone_suffix(&suffix).await? {
                    return Ok(Some(user_id));
                }
            }
        }

        if let Some(email) = payment.email.as_deref() {
            if !email.is_empty() {
                if let Some(user_id) = self.store.find_user_by_email(email).await? {
                    return Ok(Some(user_id));
                }
            }
        }

        Ok(None)
    }
}

/// Last 10 digits of a contact number, ignoring spacing and any country-code
/// prefix. Numbers shorter than 10 digits are used whole.
pub fn phone_suffix(contact: &str) -> Option<String> {
    let digits: String = contact.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let start = digits.len().saturating_sub(10);
    Some(digits[start..].to_string())
}

/// Gateway amounts arrive in minor units (paise); stored amounts are major
/// units with two decimal places.
pub fn minor_to_major(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}
