mod api;
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod services;
mod utils;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fcm_push::{FcmClient, ServiceAccountKey};
use onesignal_push::OneSignalClient;
use sms_gateway::SmsGateway;

use crate::config::Config;
use crate::db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admin_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize database connection
    let db = Database::connect(&config).await?;
    tracing::info!("Database connection established");

    // Run database migrations
    db.run_migrations().await?;

    // Notification adapters
    let notifiers = build_notifiers(&config)?;

    // Build application state
    let state = AppState {
        db,
        config: config.clone(),
        notifiers,
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api::routes(state.clone()))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub notifiers: Notifiers,
}

#[derive(Clone)]
pub struct Notifiers {
    pub onesignal: Arc<OneSignalClient>,
    pub sms: Arc<SmsGateway>,
    pub fcm: Option<Arc<FcmClient>>,
}

fn build_notifiers(config: &Config) -> anyhow::Result<Notifiers> {
    let onesignal = Arc::new(OneSignalClient::new(
        config.onesignal.app_id.clone(),
        config.onesignal.rest_api_key.clone(),
    ));

    let sms = Arc::new(SmsGateway::new(config.sms.clone()));

    let fcm = match &config.fcm {
        Some(fcm_config) => {
            let raw = std::fs::read_to_string(&fcm_config.credentials_path)?;
            let key: ServiceAccountKey = serde_json::from_str(&raw)?;
            tracing::info!(project_id = %fcm_config.project_id, "FCM client configured");
            Some(Arc::new(FcmClient::new(
                fcm_config.project_id.clone(),
                key,
            )))
        }
        None => {
            tracing::info!("FCM not configured, device push disabled");
            None
        }
    };

    Ok(Notifiers {
        onesignal,
        sms,
        fcm,
    })
}
