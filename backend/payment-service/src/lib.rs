/// Thaedal Payment Service
///
/// Reconciles the local payments ledger against the Razorpay captured-payment
/// history, so revenue reporting stays correct even when webhook ingestion
/// misses events. The `backfill-payments` binary runs the job over a bounded
/// historical window.

pub mod config;
pub mod jobs;
pub mod razorpay;
pub mod store;
