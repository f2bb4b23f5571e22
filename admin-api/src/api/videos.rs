use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::services::{CatalogService, CreateVideo, ListVideosParams, UpdateVideo, Video};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(create_video))
        .route("/:id", get(get_video).put(update_video).delete(delete_video))
        .route("/:id/publish", post(publish_video))
        .route("/:id/unpublish", post(unpublish_video))
}

#[derive(Debug, Deserialize)]
pub struct ListVideosQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category_id: Option<Uuid>,
    pub published: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<Video>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<ListVideosQuery>,
) -> Result<Json<VideoListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let catalog = CatalogService::new(state.db.clone());
    let (videos, total) = catalog
        .list_videos(ListVideosParams {
            page,
            limit,
            category_id: query.category_id,
            published: query.published,
            search: query.search,
        })
        .await?;

    Ok(Json(VideoListResponse {
        videos,
        total,
        page,
        limit,
    }))
}

async fn get_video(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Video>> {
    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.get_video(id).await?))
}

async fn create_video(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Json(payload): Json<CreateVideo>,
) -> Result<Json<Video>> {
    require_catalog_role(&current_admin)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.create_video(payload).await?))
}

async fn update_video(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVideo>,
) -> Result<Json<Video>> {
    require_catalog_role(&current_admin)?;

    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.update_video(id, payload).await?))
}

async fn publish_video(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Video>> {
    require_catalog_role(&current_admin)?;

    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.set_video_published(id, true).await?))
}

async fn unpublish_video(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Video>> {
    require_catalog_role(&current_admin)?;

    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.set_video_published(id, false).await?))
}

async fn delete_video(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    require_catalog_role(&current_admin)?;

    let catalog = CatalogService::new(state.db.clone());
    catalog.delete_video(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

fn require_catalog_role(admin: &CurrentAdmin) -> Result<()> {
    if !admin.role.can_manage_catalog() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
