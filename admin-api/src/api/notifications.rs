use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use fcm_push::FcmError;
use onesignal_push::{Audience, OneSignalError, PushMessage};
use sms_gateway::SmsError;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/push", post(send_push))
        .route("/push/device", post(send_device_push))
        .route("/sms", post(send_sms))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PushRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
    pub data: Option<serde_json::Value>,
    pub audience: Audience,
}

#[derive(Debug, Serialize)]
pub struct PushResponse {
    pub notification_id: String,
    pub recipients: i64,
}

/// Broadcast a push notification to an audience via OneSignal.
async fn send_push(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Json(payload): Json<PushRequest>,
) -> Result<Json<PushResponse>> {
    require_notification_role(&current_admin)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let message = PushMessage {
        title: payload.title,
        body: payload.body,
        data: payload.data,
    };

    let result = state
        .notifiers
        .onesignal
        .send(&message, &payload.audience)
        .await
        .map_err(|e| match e {
            OneSignalError::Rejected(msg) => AppError::BadRequest(msg),
            other => AppError::Upstream(other.to_string()),
        })?;

    tracing::info!(
        notification_id = %result.notification_id,
        recipients = result.recipients,
        "push notification sent"
    );

    Ok(Json(PushResponse {
        notification_id: result.notification_id,
        recipients: result.recipients,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct DevicePushRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct DevicePushResponse {
    pub message_id: String,
}

/// Push to one user's registered device via FCM.
async fn send_device_push(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Json(payload): Json<DevicePushRequest>,
) -> Result<Json<DevicePushResponse>> {
    require_notification_role(&current_admin)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let fcm = state
        .notifiers
        .fcm
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Device push is not configured".to_string()))?;

    let device_token: Option<Option<String>> =
        sqlx::query_scalar("SELECT device_token FROM users WHERE id = $1")
            .bind(payload.user_id)
            .fetch_optional(&state.db.pg)
            .await?;

    let device_token = device_token
        .ok_or(AppError::NotFound(format!(
            "User {} not found",
            payload.user_id
        )))?
        .ok_or_else(|| AppError::BadRequest("User has no registered device".to_string()))?;

    let result = fcm
        .send(&device_token, &payload.title, &payload.body, payload.data)
        .await
        .map_err(|e| match e {
            FcmError::InvalidToken => {
                AppError::BadRequest("Stored device token is invalid".to_string())
            }
            other => AppError::Upstream(other.to_string()),
        })?;

    Ok(Json(DevicePushResponse {
        message_id: result.message_id,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SmsRequest {
    #[validate(length(min = 5, max = 20))]
    pub to: String,
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
}

async fn send_sms(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Json(payload): Json<SmsRequest>,
) -> Result<Json<serde_json::Value>> {
    require_notification_role(&current_admin)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state
        .notifiers
        .sms
        .send(&payload.to, &payload.message)
        .await
        .map_err(|e| match e {
            SmsError::Misconfigured(msg) => AppError::BadRequest(msg),
            other => AppError::Upstream(other.to_string()),
        })?;

    Ok(Json(serde_json::json!({ "success": true })))
}

fn require_notification_role(admin: &CurrentAdmin) -> Result<()> {
    if !admin.role.can_send_notifications() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
