use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::errors::FcmError;
use crate::models::*;

const DEFAULT_API_BASE: &str = "https://fcm.googleapis.com";

/// Firebase Cloud Messaging Client
///
/// Handles FCM HTTP v1 delivery for Android and Web push notifications.
/// Manages OAuth2 token generation, caching, and message delivery.
pub struct FcmClient {
    pub project_id: String,
    pub credentials: Arc<ServiceAccountKey>,
    api_base: String,
    token_cache: Arc<Mutex<Option<TokenCache>>>,
    http_client: reqwest::Client,
}

impl FcmClient {
    /// Create new FCM client
    ///
    /// # Arguments
    /// * `project_id` - Firebase project ID
    /// * `credentials` - Service account key with OAuth2 credentials
    pub fn new(project_id: String, credentials: ServiceAccountKey) -> Self {
        Self {
            project_id,
            credentials: Arc::new(credentials),
            api_base: DEFAULT_API_BASE.to_string(),
            token_cache: Arc::new(Mutex::new(None)),
            http_client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different FCM endpoint (tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Send notification via FCM to a single device
    pub async fn send(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: Option<serde_json::Value>,
    ) -> Result<FcmSendResult, FcmError> {
        if !Self::token_looks_valid(device_token) {
            return Err(FcmError::InvalidToken);
        }

        let access_token = self.get_access_token().await?;

        let message = FcmMessage {
            message: FcmMessageContent {
                token: device_token.to_string(),
                notification: FcmNotification {
                    title: title.to_string(),
                    body: body.to_string(),
                },
                data,
            },
        };

        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.api_base, self.project_id
        );

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", "application/json")
            .json(&message)
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let fcm_response: FcmApiResponse = response.json().await?;

                Ok(FcmSendResult {
                    message_id: fcm_response
                        .name
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    success: true,
                    error: None,
                })
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());

                Err(FcmError::Api {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    /// Send multicast notification (to multiple devices)
    pub async fn send_multicast(
        &self,
        device_tokens: &[String],
        title: &str,
        body: &str,
        data: Option<serde_json::Value>,
    ) -> Result<MulticastSendResult, FcmError> {
        let mut results = Vec::new();
        let mut success_count = 0;
        let mut failure_count = 0;

        for device_token in device_tokens {
            match self.send(device_token, title, body, data.clone()).await {
                Ok(result) => {
                    results.push(result);
                    success_count += 1;
                }
                Err(e) => {
                    results.push(FcmSendResult {
                        message_id: Uuid::new_v4().to_string(),
                        success: false,
                        error: Some(e.to_string()),
                    });
                    failure_count += 1;
                }
            }
        }

        Ok(MulticastSendResult {
            success_count,
            failure_count,
            results,
        })
    }

    /// Device token sanity check. FCM registration tokens are typically
    /// 100-200 characters.
    pub fn token_looks_valid(device_token: &str) -> bool {
        device_token.len() >= 10 && device_token.len() <= 1000
    }

    /// Get access token from service account (with caching)
    pub async fn get_access_token(&self) -> Result<String, FcmError> {
        // Check if we have a cached token that's still valid
        {
            let cache = self.token_cache.lock().expect("Token cache lock poisoned");
            if let Some(cached) = cache.as_ref() {
                let now = Utc::now().timestamp();
                if cached.expires_at > now + 60 {
                    // Token is still valid for at least 60 more seconds
                    return Ok(cached.access_token.clone());
                }
            }
        }

        // Generate new JWT and exchange for access token
        let now = Utc::now();
        let exp = (now + Duration::hours(1)).timestamp();
        let iat = now.timestamp();

        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            sub: self.credentials.client_email.clone(),
            scope: "https://www.googleapis.com/auth/cloud-platform".to_string(),
            aud: self.credentials.token_uri.clone(),
            exp,
            iat,
        };

        // Sign JWT with private key
        let encoding_key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| FcmError::KeyParse(e.to_string()))?;

        let token = encode(&Header::new(jsonwebtoken::Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| FcmError::JwtEncode(e.to_string()))?;

        // Exchange JWT for access token
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &token),
        ];

        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FcmError::TokenStatus(response.status().as_u16()));
        }

        let token_response: GoogleTokenResponse = response.json().await?;

        // Cache the token
        let expires_at = Utc::now().timestamp() + token_response.expires_in;
        {
            let mut cache = self.token_cache.lock().expect("Token cache lock poisoned");
            *cache = Some(TokenCache {
                access_token: token_response.access_token.clone(),
                expires_at,
            });
        }

        Ok(token_response.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credentials(token_uri: String) -> ServiceAccountKey {
        ServiceAccountKey {
            project_id: "thaedal-app".to_string(),
            private_key_id: "key-id".to_string(),
            private_key: "private-key".to_string(),
            client_email: "push@thaedal-app.iam.gserviceaccount.com".to_string(),
            client_id: "123456".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri,
        }
    }

    #[test]
    fn client_creation() {
        let client = FcmClient::new(
            "thaedal-app".to_string(),
            test_credentials("https://oauth2.googleapis.com/token".to_string()),
        );
        assert_eq!(client.project_id, "thaedal-app");
    }

    #[test]
    fn token_validation() {
        assert!(FcmClient::token_looks_valid(
            "valid_token_with_reasonable_length_12345678"
        ));
        assert!(!FcmClient::token_looks_valid(""));
        assert!(!FcmClient::token_looks_valid("short"));
        assert!(!FcmClient::token_looks_valid(&"x".repeat(1001)));
    }

    #[tokio::test]
    async fn send_rejects_invalid_token_without_network() {
        let client = FcmClient::new(
            "thaedal-app".to_string(),
            test_credentials("http://127.0.0.1:1/token".to_string()),
        );
        let err = client.send("short", "t", "b", None).await.unwrap_err();
        assert!(matches!(err, FcmError::InvalidToken));
    }

    #[tokio::test]
    async fn cached_access_token_is_reused() {
        let client = FcmClient::new(
            "thaedal-app".to_string(),
            test_credentials("http://127.0.0.1:1/token".to_string()),
        );
        {
            let mut cache = client.token_cache.lock().unwrap();
            *cache = Some(TokenCache {
                access_token: "cached-token".to_string(),
                expires_at: Utc::now().timestamp() + 3600,
            });
        }
        // Token endpoint is unreachable, so a hit proves the cache was used.
        let token = client.get_access_token().await.unwrap();
        assert_eq!(token, "cached-token");
    }

    #[tokio::test]
    async fn send_posts_v1_message_and_parses_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/thaedal-app/messages:send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/thaedal-app/messages/abc123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = FcmClient::new(
            "thaedal-app".to_string(),
            test_credentials(format!("{}/token", server.uri())),
        )
        .with_api_base(server.uri());
        {
            let mut cache = client.token_cache.lock().unwrap();
            *cache = Some(TokenCache {
                access_token: "cached-token".to_string(),
                expires_at: Utc::now().timestamp() + 3600,
            });
        }

        let result = client
            .send("device_token_1234567890", "Title", "Body", None)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.message_id, "projects/thaedal-app/messages/abc123");
    }

    #[tokio::test]
    async fn send_transport_failure_is_not_reported_as_a_token_error() {
        // Cached token keeps the OAuth endpoint out of the picture, so the
        // connection failure below comes from the send call itself.
        let client = FcmClient::new(
            "thaedal-app".to_string(),
            test_credentials("http://127.0.0.1:1/token".to_string()),
        )
        .with_api_base("http://127.0.0.1:1");
        {
            let mut cache = client.token_cache.lock().unwrap();
            *cache = Some(TokenCache {
                access_token: "cached-token".to_string(),
                expires_at: Utc::now().timestamp() + 3600,
            });
        }

        let err = client
            .send("device_token_1234567890", "Title", "Body", None)
            .await
            .unwrap_err();
        assert!(matches!(err, FcmError::Transport(_)));
        assert!(!err.to_string().contains("Token request"));
    }

    #[tokio::test]
    async fn multicast_counts_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/thaedal-app/messages:send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/thaedal-app/messages/ok"
            })))
            .mount(&server)
            .await;

        let client = FcmClient::new(
            "thaedal-app".to_string(),
            test_credentials(format!("{}/token", server.uri())),
        )
        .with_api_base(server.uri());
        {
            let mut cache = client.token_cache.lock().unwrap();
            *cache = Some(TokenCache {
                access_token: "cached-token".to_string(),
                expires_at: Utc::now().timestamp() + 3600,
            });
        }

        let tokens = vec![
            "device_token_1234567890".to_string(),
            "bad".to_string(), // fails validation before the network call
        ];
        let result = client
            .send_multicast(&tokens, "Title", "Body", None)
            .await
            .unwrap();
        assert_eq!(result.success_count, 1);
        assert_eq!(result.failure_count, 1);
        assert_eq!(result.results.len(), 2);
    }
}
