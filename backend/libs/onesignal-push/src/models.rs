use serde::{Deserialize, Serialize};

/// Notification content, independent of targeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Outcome of a OneSignal notification create call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSendResult {
    pub notification_id: String,
    pub recipients: i64,
}

/// OneSignal create-notification response body.
#[derive(Debug, Deserialize)]
pub struct OneSignalApiResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub recipients: i64,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}
