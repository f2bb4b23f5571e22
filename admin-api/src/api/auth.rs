use axum::{extract::State, Extension, Json};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{Claims, CurrentAdmin};
use crate::models::Admin;
use crate::services::AuthService;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub admin: AdminInfo,
}

#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

pub(super) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let auth_service = AuthService::new(state.db.clone(), state.config.clone());
    let (admin, access_token, refresh_token) = auth_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        admin: AdminInfo {
            id: admin.id.to_string(),
            email: admin.email,
            name: admin.name,
            role: admin.role,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

pub(super) async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let claims = decode::<Claims>(
        &payload.refresh_token,
        &DecodingKey::from_secret(state.config.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?
    .claims;

    // The admin must still exist and be active to refresh
    let admin: Admin = sqlx::query_as("SELECT * FROM admins WHERE id = $1 AND status = 'active'")
        .bind(uuid::Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?)
        .fetch_optional(&state.db.pg)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let auth_service = AuthService::new(state.db.clone(), state.config.clone());
    let access_token = auth_service.generate_access_token(&admin)?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Get current authenticated admin info
pub(super) async fn me(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
) -> Result<Json<AdminInfo>> {
    let admin: Admin = sqlx::query_as("SELECT * FROM admins WHERE id = $1")
        .bind(uuid::Uuid::parse_str(&current_admin.id).map_err(|_| AppError::Unauthorized)?)
        .fetch_optional(&state.db.pg)
        .await?
        .ok_or(AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(AdminInfo {
        id: admin.id.to_string(),
        email: admin.email,
        name: admin.name,
        role: admin.role,
    }))
}
