use serde::{Deserialize, Serialize};

/// Outcome of a single FCM send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FcmSendResult {
    pub message_id: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Firebase Service Account Key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
}

/// OAuth2 Token Cache
#[derive(Debug, Clone)]
pub struct TokenCache {
    pub access_token: String,
    pub expires_at: i64,
}

/// JWT Claims for Google OAuth2
#[derive(Debug, Serialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

/// Google OAuth2 Token Response
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[allow(dead_code)]
    pub token_type: String,
}

/// FCM Message Request
#[derive(Debug, Serialize)]
pub struct FcmMessage {
    pub message: FcmMessageContent,
}

/// FCM Message Content
#[derive(Debug, Serialize)]
pub struct FcmMessageContent {
    pub token: String,
    pub notification: FcmNotification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// FCM Notification Payload
#[derive(Debug, Serialize)]
pub struct FcmNotification {
    pub title: String,
    pub body: String,
}

/// FCM API Response
#[derive(Debug, Deserialize)]
pub struct FcmApiResponse {
    pub name: Option<String>,
}

/// Multicast send result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulticastSendResult {
    pub success_count: usize,
    pub failure_count: usize,
    pub results: Vec<FcmSendResult>,
}
