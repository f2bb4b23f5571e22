//! Backfill the local payments ledger from Razorpay captured payments.
//! Run with: cargo run --bin backfill-payments -- --from 2026-07-01 --to 2026-07-31

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payment_service::config::Config;
use payment_service::jobs::{ReconcileJob, ReconcileOptions};
use payment_service::razorpay::RazorpayClient;
use payment_service::store::PgPaymentStore;

#[derive(Parser, Debug)]
#[command(
    name = "backfill-payments",
    version,
    about = "Reconcile the payments table against Razorpay captured payments"
)]
struct Args {
    /// Window start (inclusive), YYYY-MM-DD. Defaults to 30 days ago.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Window end (inclusive), YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payment_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load()?;

    let today = Utc::now().date_naive();
    let from_date = args.from.unwrap_or(today - Duration::days(30));
    let to_date = args.to.unwrap_or(today);
    if from_date > to_date {
        anyhow::bail!("--from must not be after --to");
    }

    let options = ReconcileOptions {
        from: Utc.from_utc_datetime(&from_date.and_hms_opt(0, 0, 0).expect("valid midnight")),
        to: Utc.from_utc_datetime(&to_date.and_hms_opt(23, 59, 59).expect("valid end of day")),
        page_size: config.reconcile.page_size,
        receipt_prefix: config.reconcile.receipt_prefix.clone(),
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let gateway = RazorpayClient::new(
        config.razorpay.key_id.clone(),
        config.razorpay.key_secret.clone(),
        config.razorpay.api_base.clone(),
    );
    let store = PgPaymentStore::new(pool);

    let job = ReconcileJob::new(gateway, store, options);
    let summary = job.run().await?;

    println!(
        "Backfill {} to {}: {}",
        from_date, to_date, summary
    );

    Ok(())
}
