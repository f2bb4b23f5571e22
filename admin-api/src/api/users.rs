use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::services::{ListUsersParams, User, UserService};
use crate::utils::{mask_email, mask_phone};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user))
        .route("/:id/block", post(block_user))
        .route("/:id/unblock", post(unblock_user))
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummaryResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// List rows carry masked contact details; the detail view has the full row.
#[derive(Debug, Serialize)]
pub struct UserSummaryResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub status: String,
    pub created_at: String,
}

async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let user_service = UserService::new(state.db.clone());
    let (users, total) = user_service
        .list_users(ListUsersParams {
            page,
            limit,
            status: query.status,
            search: query.search,
        })
        .await?;

    let users_response: Vec<UserSummaryResponse> = users
        .into_iter()
        .map(|u| UserSummaryResponse {
            id: u.id.to_string(),
            name: u.name,
            email: u.email.as_deref().map(mask_email),
            phone_number: u.phone_number.as_deref().map(mask_phone),
            status: u.status,
            created_at: u.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(UserListResponse {
        users: users_response,
        total,
        page,
        limit,
    }))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<User>> {
    let user_id = parse_id(&id)?;

    let user_service = UserService::new(state.db.clone());
    let user = user_service.get_user(user_id).await?;

    Ok(Json(user))
}

async fn block_user(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    if !current_admin.role.can_block_users() {
        return Err(AppError::Forbidden);
    }

    let user_id = parse_id(&id)?;
    let user_service = UserService::new(state.db.clone());
    user_service.block_user(user_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("User {} has been blocked", id),
    })))
}

async fn unblock_user(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    if !current_admin.role.can_block_users() {
        return Err(AppError::Forbidden);
    }

    let user_id = parse_id(&id)?;
    let user_service = UserService::new(state.db.clone());
    user_service.unblock_user(user_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("User {} has been unblocked", id),
    })))
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::BadRequest("Invalid user ID".to_string()))
}
