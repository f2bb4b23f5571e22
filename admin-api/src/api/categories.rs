use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::services::{CatalogService, Category, CreateCategory, UpdateCategory};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.list_categories().await?))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>> {
    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.get_category(id).await?))
}

async fn create_category(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Json(payload): Json<CreateCategory>,
) -> Result<Json<Category>> {
    require_catalog_role(&current_admin)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.create_category(payload).await?))
}

async fn update_category(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategory>,
) -> Result<Json<Category>> {
    require_catalog_role(&current_admin)?;

    let catalog = CatalogService::new(state.db.clone());
    Ok(Json(catalog.update_category(id, payload).await?))
}

async fn delete_category(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    require_catalog_role(&current_admin)?;

    let catalog = CatalogService::new(state.db.clone());
    catalog.delete_category(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

fn require_catalog_role(admin: &CurrentAdmin) -> Result<()> {
    if !admin.role.can_manage_catalog() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
