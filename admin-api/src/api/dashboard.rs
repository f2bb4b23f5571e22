use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::services::DashboardService;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/charts/revenue", get(get_revenue_chart))
        .route("/charts/users", get(get_user_chart))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub days: Option<i64>,
}

impl ChartQuery {
    // 1..=365, default 30
    fn days(&self) -> i64 {
        self.days.unwrap_or(30).clamp(1, 365)
    }
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let dashboard = DashboardService::new(state.db.clone());
    let stats = dashboard.get_stats().await?;

    Ok(Json(serde_json::json!({ "stats": stats })))
}

async fn get_revenue_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<serde_json::Value>> {
    let dashboard = DashboardService::new(state.db.clone());
    let points = dashboard.get_revenue_chart(query.days()).await?;

    Ok(Json(serde_json::json!({ "points": points })))
}

async fn get_user_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<serde_json::Value>> {
    let dashboard = DashboardService::new(state.db.clone());
    let points = dashboard.get_user_chart(query.days()).await?;

    Ok(Json(serde_json::json!({ "points": points })))
}
