use serde_json::{json, Value};

use crate::audience::Audience;
use crate::errors::OneSignalError;
use crate::models::{OneSignalApiResponse, PushMessage, PushSendResult};

const DEFAULT_API_BASE: &str = "https://onesignal.com";

/// OneSignal REST API client.
pub struct OneSignalClient {
    app_id: String,
    rest_api_key: String,
    api_base: String,
    http_client: reqwest::Client,
}

impl OneSignalClient {
    pub fn new(app_id: String, rest_api_key: String) -> Self {
        Self {
            app_id,
            rest_api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different OneSignal endpoint (tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Broadcast one notification to the given audience.
    pub async fn send(
        &self,
        message: &PushMessage,
        audience: &Audience,
    ) -> Result<PushSendResult, OneSignalError> {
        let payload = self.build_payload(message, audience);

        let response = self
            .http_client
            .post(format!("{}/api/v1/notifications", self.api_base))
            .header("Authorization", format!("Basic {}", self.rest_api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OneSignalError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: OneSignalApiResponse = response.json().await?;

        // 200 with an errors array means nothing was delivered (e.g. the
        // audience matched no devices).
        if let Some(errors) = api_response.errors {
            return Err(OneSignalError::Rejected(errors.to_string()));
        }

        Ok(PushSendResult {
            notification_id: api_response.id.unwrap_or_default(),
            recipients: api_response.recipients,
        })
    }

    fn build_payload(&self, message: &PushMessage, audience: &Audience) -> Value {
        let mut payload = serde_json::Map::new();
        payload.insert("app_id".into(), json!(self.app_id));
        payload.insert("headings".into(), json!({"en": message.title}));
        payload.insert("contents".into(), json!({"en": message.body}));
        if let Some(data) = &message.data {
            payload.insert("data".into(), data.clone());
        }
        audience.apply_to(&mut payload);
        Value::Object(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> PushMessage {
        PushMessage {
            title: "New episode".to_string(),
            body: "Season finale is live".to_string(),
            data: None,
        }
    }

    #[test]
    fn payload_carries_app_id_and_contents() {
        let client = OneSignalClient::new("app-1".to_string(), "key".to_string());
        let payload = client.build_payload(&message(), &Audience::All);

        assert_eq!(payload["app_id"], "app-1");
        assert_eq!(payload["headings"]["en"], "New episode");
        assert_eq!(payload["contents"]["en"], "Season finale is live");
        assert_eq!(payload["included_segments"], json!(["All"]));
    }

    #[tokio::test]
    async fn send_posts_notification_and_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/notifications"))
            .and(header("Authorization", "Basic rest-key"))
            .and(body_partial_json(json!({
                "app_id": "app-1",
                "include_external_user_ids": ["user-42"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "notif-1",
                "recipients": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OneSignalClient::new("app-1".to_string(), "rest-key".to_string())
            .with_api_base(server.uri());
        let result = client
            .send(
                &message(),
                &Audience::User {
                    external_id: "user-42".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.notification_id, "notif-1");
        assert_eq!(result.recipients, 1);
    }

    #[tokio::test]
    async fn send_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/notifications"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad app id"))
            .mount(&server)
            .await;

        let client = OneSignalClient::new("app-1".to_string(), "rest-key".to_string())
            .with_api_base(server.uri());
        let err = client.send(&message(), &Audience::All).await.unwrap_err();
        match err {
            OneSignalError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("bad app id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn send_treats_error_body_as_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "",
                "recipients": 0,
                "errors": ["All included players are not subscribed"]
            })))
            .mount(&server)
            .await;

        let client = OneSignalClient::new("app-1".to_string(), "rest-key".to_string())
            .with_api_base(server.uri());
        let err = client
            .send(&message(), &Audience::Unsubscribed)
            .await
            .unwrap_err();
        assert!(matches!(err, OneSignalError::Rejected(_)));
    }
}
