use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::services::{BillingService, ListBillingParams, Subscription};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions))
        .route("/:id", get(get_subscription))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<Subscription>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

async fn list_subscriptions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<SubscriptionListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let billing = BillingService::new(state.db.clone());
    let (subscriptions, total) = billing
        .list_subscriptions(ListBillingParams {
            page,
            limit,
            status: query.status,
            user_id: query.user_id,
        })
        .await?;

    Ok(Json(SubscriptionListResponse {
        subscriptions,
        total,
        page,
        limit,
    }))
}

async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Subscription>> {
    let billing = BillingService::new(state.db.clone());
    Ok(Json(billing.get_subscription(id).await?))
}
