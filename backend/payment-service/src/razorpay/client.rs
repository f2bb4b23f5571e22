use thiserror::Error;

use crate::razorpay::models::{PaymentCollection, RemoteOrder, RemotePayment};

/// Razorpay Client Error Types
#[derive(Error, Debug)]
pub enum RazorpayError {
    #[error("Razorpay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Razorpay API error: {status} - {body}")]
    Api { status: u16, body: String },
}

/// Razorpay REST API client. Constructed explicitly and passed to whatever
/// needs it; holds no state beyond credentials and the HTTP client.
pub struct RazorpayClient {
    key_id: String,
    key_secret: String,
    api_base: String,
    http_client: reqwest::Client,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String, api_base: String) -> Self {
        Self {
            key_id,
            key_secret,
            api_base,
            http_client: reqwest::Client::new(),
        }
    }

    /// Fetch one page of payments inside the `[from, to]` unix-timestamp
    /// window. `skip`/`count` drive pagination.
    pub async fn list_payments(
        &self,
        from: i64,
        to: i64,
        count: u32,
        skip: u32,
    ) -> Result<Vec<RemotePayment>, RazorpayError> {
        let url = format!("{}/v1/payments", self.api_base);
        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .query(&[
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("count", count.to_string()),
                ("skip", skip.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let collection: PaymentCollection = response.json().await?;
        Ok(collection.items)
    }

    /// Fetch the order a payment belongs to.
    pub async fn fetch_order(&self, order_id: &str) -> Result<RemoteOrder, RazorpayError> {
        let url = format!("{}/v1/orders/{}", self.api_base, order_id);
        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_payments_parses_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payments"))
            .and(query_param("count", "10"))
            .and(query_param("skip", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "entity": "collection",
                "count": 1,
                "items": [{
                    "id": "pay_1",
                    "order_id": "order_1",
                    "status": "captured",
                    "contact": "+919876543210",
                    "email": "a@b.in",
                    "amount": 29900,
                    "currency": "INR",
                    "method": "upi",
                    "created_at": 1700000000
                }]
            })))
            .mount(&server)
            .await;

        let client = RazorpayClient::new("key".into(), "secret".into(), server.uri());
        let payments = client.list_payments(1, 2, 10, 0).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert!(payments[0].is_captured());
        assert_eq!(payments[0].amount, 29900);
    }

    #[tokio::test]
    async fn fetch_order_returns_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/orders/order_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "order_1",
                "receipt": "thaedal_42"
            })))
            .mount(&server)
            .await;

        let client = RazorpayClient::new("key".into(), "secret".into(), server.uri());
        let order = client.fetch_order("order_1").await.unwrap();
        assert_eq!(order.receipt.as_deref(), Some("thaedal_42"));
    }

    #[tokio::test]
    async fn api_errors_carry_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/orders/order_missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("order not found"))
            .mount(&server)
            .await;

        let client = RazorpayClient::new("key".into(), "secret".into(), server.uri());
        let err = client.fetch_order("order_missing").await.unwrap_err();
        match err {
            RazorpayError::Api { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("order not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
