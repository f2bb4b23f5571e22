use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::services::{BillingService, ListBillingParams, Payment};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments))
        .route("/:id", get(get_payment))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<Payment>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaymentListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let billing = BillingService::new(state.db.clone());
    let (payments, total) = billing
        .list_payments(ListBillingParams {
            page,
            limit,
            status: query.status,
            user_id: query.user_id,
        })
        .await?;

    Ok(Json(PaymentListResponse {
        payments,
        total,
        page,
        limit,
    }))
}

async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>> {
    let billing = BillingService::new(state.db.clone());
    Ok(Json(billing.get_payment(id).await?))
}
