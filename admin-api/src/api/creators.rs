use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::services::{CatalogService, CreateCreator, Creator, UpdateCreator};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_creators).post(create_creator))
        .route(
            "/:id",
            get(get_creator).put(update_creator).delete(delete_creator),
        )
}

async fn list_creators(State(state): State<AppState>) -> Result<Json<Vec<Creator>>> {
    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.list_creators().await?))
}

async fn get_creator(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Creator>> {
    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.get_creator(id).await?))
}

async fn create_creator(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Json(payload): Json<CreateCreator>,
) -> Result<Json<Creator>> {
    require_catalog_role(&current_admin)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.create_creator(payload).await?))
}

async fn update_creator(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCreator>,
) -> Result<Json<Creator>> {
    require_catalog_role(&current_admin)?;

    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.update_creator(id, payload).await?))
}

async fn delete_creator(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    require_catalog_role(&current_admin)?;

    let catalog = CatalogService::new(state.db.clone());
    catalog.delete_creator(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

fn require_catalog_role(admin: &CurrentAdmin) -> Result<()> {
    if !admin.role.can_manage_catalog() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
