//! Reconciliation job behavior against a mocked gateway and an in-memory
//! payment store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use payment_service::jobs::{ReconcileError, ReconcileJob, ReconcileOptions};
use payment_service::razorpay::RazorpayClient;
use payment_service::store::{PaymentStore, ReconciledPayment, StoreError};

#[derive(Debug, Clone)]
struct StoredUser {
    id: Uuid,
    phone_number: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Default)]
struct InMemoryStore {
    users: Mutex<Vec<StoredUser>>,
    payments: Mutex<Vec<ReconciledPayment>>,
    locked: AtomicBool,
}

impl InMemoryStore {
    fn with_user(self, phone_number: Option<&str>, email: Option<&str>) -> (Self, Uuid) {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().push(StoredUser {
            id,
            phone_number: phone_number.map(String::from),
            email: email.map(String::from),
        });
        (self, id)
    }

    fn payments(&self) -> Vec<ReconciledPayment> {
        self.payments.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentStore for &InMemoryStore {
    async fn try_lock(&self) -> Result<bool, StoreError> {
        Ok(self
            .locked
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok())
    }

    async fn unlock(&self) -> Result<(), StoreError> {
        self.locked.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn find_user_by_phone_suffix(&self, suffix: &str) -> Result<Option<Uuid>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| {
                u.phone_number
                    .as_deref()
                    .is_some_and(|p| p.ends_with(suffix))
            })
            .map(|u| u.id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<Uuid>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .map(|u| u.id))
    }

    async fn payment_exists(&self, order_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.order_id == order_id))
    }

    async fn mark_payment_captured(&self, payment: &ReconciledPayment) -> Result<(), StoreError> {
        let mut payments = self.payments.lock().unwrap();
        if let Some(existing) = payments.iter_mut().find(|p| p.order_id == payment.order_id) {
            *existing = payment.clone();
        }
        Ok(())
    }

    async fn insert_backfilled_payment(
        &self,
        payment: &ReconciledPayment,
    ) -> Result<(), StoreError> {
        self.payments.lock().unwrap().push(payment.clone());
        Ok(())
    }
}

fn options() -> ReconcileOptions {
    ReconcileOptions {
        from: Utc::now() - Duration::days(30),
        to: Utc::now(),
        page_size: 100,
        receipt_prefix: "thaedal_".to_string(),
    }
}

fn payment_json(id: &str, order_id: &str, status: &str, contact: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "order_id": order_id,
        "status": status,
        "contact": contact,
        "email": "buyer@example.in",
        "amount": 29900,
        "currency": "INR",
        "method": "upi",
        "created_at": 1700000000
    })
}

fn page(items: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({"entity": "collection", "count": items.len(), "items": items})
}

async fn mock_single_page(server: &MockServer, items: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/v1/payments"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(items)))
        .mount(server)
        .await;
}

async fn mock_order(server: &MockServer, order_id: &str, receipt: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/orders/{order_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": order_id,
            "receipt": receipt
        })))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> RazorpayClient {
    RazorpayClient::new("key".into(), "secret".into(), server.uri())
}

#[tokio::test]
async fn non_captured_payments_cause_no_writes() {
    let server = MockServer::start().await;
    mock_single_page(
        &server,
        vec![
            payment_json("pay_1", "order_1", "failed", "+919876543210"),
            payment_json("pay_2", "order_2", "refunded", "+919876543210"),
        ],
    )
    .await;

    let (store, _) = InMemoryStore::default().with_user(Some("9876543210"), None);
    let job = ReconcileJob::new(client(&server), &store, options());
    let summary = job.run().await.unwrap();

    assert_eq!(summary.created, 0);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.skipped, 0);
    assert!(store.payments().is_empty());
}

#[tokio::test]
async fn foreign_receipts_are_ignored_silently() {
    let server = MockServer::start().await;
    mock_single_page(
        &server,
        vec![payment_json("pay_1", "order_1", "captured", "+919876543210")],
    )
    .await;
    mock_order(&server, "order_1", "othershop_99").await;

    let (store, _) = InMemoryStore::default().with_user(Some("9876543210"), None);
    let job = ReconcileJob::new(client(&server), &store, options());
    let summary = job.run().await.unwrap();

    assert_eq!(summary.created, 0);
    assert_eq!(summary.skipped, 0);
    assert!(store.payments().is_empty());
}

#[tokio::test]
async fn malformed_entries_are_dropped_silently() {
    let server = MockServer::start().await;
    mock_single_page(
        &server,
        vec![serde_json::json!({
            "id": null,
            "order_id": "order_1",
            "status": "captured",
            "contact": "+919876543210",
            "email": null,
            "amount": 29900,
            "currency": "INR",
            "method": "upi",
            "created_at": 1700000000
        })],
    )
    .await;

    let (store, _) = InMemoryStore::default().with_user(Some("9876543210"), None);
    let job = ReconcileJob::new(client(&server), &store, options());
    let summary = job.run().await.unwrap();

    assert_eq!(summary.created, 0);
    assert_eq!(summary.skipped, 0);
}

#[tokio::test]
async fn contact_with_country_code_matches_stored_suffix() {
    let server = MockServer::start().await;
    mock_single_page(
        &server,
        vec![payment_json("pay_1", "order_1", "captured", "+91 98765 43210")],
    )
    .await;
    mock_order(&server, "order_1", "thaedal_1001").await;

    let (store, user_id) = InMemoryStore::default().with_user(Some("9876543210"), None);
    let job = ReconcileJob::new(client(&server), &store, options());
    let summary = job.run().await.unwrap();

    assert_eq!(summary.created, 1);
    let payments = store.payments();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].user_id, user_id);
    assert_eq!(payments[0].order_id, "thaedal_1001");
}

#[tokio::test]
async fn minor_unit_amounts_are_stored_as_major_units() {
    let server = MockServer::start().await;
    mock_single_page(
        &server,
        vec![payment_json("pay_1", "order_1", "captured", "+919876543210")],
    )
    .await;
    mock_order(&server, "order_1", "thaedal_1001").await;

    let (store, _) = InMemoryStore::default().with_user(Some("9876543210"), None);
    let job = ReconcileJob::new(client(&server), &store, options());
    job.run().await.unwrap();

    assert_eq!(store.payments()[0].amount, Decimal::new(29900, 2));
    assert_eq!(store.payments()[0].amount.to_string(), "299.00");
}

#[tokio::test]
async fn email_fallback_resolves_user_without_phone_match() {
    let server = MockServer::start().await;
    mock_single_page(
        &server,
        vec![payment_json("pay_1", "order_1", "captured", "+910000000000")],
    )
    .await;
    mock_order(&server, "order_1", "thaedal_1001").await;

    let (store, user_id) =
        InMemoryStore::default().with_user(Some("9876543210"), Some("buyer@example.in"));
    let job = ReconcileJob::new(client(&server), &store, options());
    let summary = job.run().await.unwrap();

    assert_eq!(summary.created, 1);
    assert_eq!(store.payments()[0].user_id, user_id);
}

#[tokio::test]
async fn unmatched_user_counts_as_skipped() {
    let server = MockServer::start().await;
    mock_single_page(
        &server,
        vec![payment_json("pay_1", "order_1", "captured", "+910000000000")],
    )
    .await;
    mock_order(&server, "order_1", "thaedal_1001").await;

    let store = InMemoryStore::default(); // no users at all
    let job = ReconcileJob::new(client(&server), &store, options());
    let summary = job.run().await.unwrap();

    assert_eq!(summary.created, 0);
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn rerun_over_same_window_updates_instead_of_duplicating() {
    let server = MockServer::start().await;
    mock_single_page(
        &server,
        vec![payment_json("pay_1", "order_1", "captured", "+919876543210")],
    )
    .await;
    mock_order(&server, "order_1", "thaedal_1001").await;

    let (store, _) = InMemoryStore::default().with_user(Some("9876543210"), None);

    let first = ReconcileJob::new(client(&server), &store, options())
        .run()
        .await
        .unwrap();
    assert_eq!(first.created, 1);
    assert_eq!(first.updated, 0);

    let second = ReconcileJob::new(client(&server), &store, options())
        .run()
        .await
        .unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 1);

    assert_eq!(store.payments().len(), 1);
}

#[tokio::test]
async fn one_failing_order_lookup_does_not_abort_the_run() {
    let server = MockServer::start().await;
    mock_single_page(
        &server,
        vec![
            payment_json("pay_1", "order_bad", "captured", "+919876543210"),
            payment_json("pay_2", "order_good", "captured", "+919876543210"),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/order_bad"))
        .respond_with(ResponseTemplate::new(502).set_body_string("gateway unavailable"))
        .mount(&server)
        .await;
    mock_order(&server, "order_good", "thaedal_1002").await;

    let (store, _) = InMemoryStore::default().with_user(Some("9876543210"), None);
    let job = ReconcileJob::new(client(&server), &store, options());
    let summary = job.run().await.unwrap();

    assert_eq!(summary.created, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(store.payments().len(), 1);
}

/// Serves `total` captured payments across `count`/`skip` pages.
struct PaymentListResponder {
    total: usize,
}

impl Respond for PaymentListResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let get_param = |name: &str| {
            request
                .url
                .query_pairs()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(0)
        };
        let count = get_param("count");
        let skip = get_param("skip");

        let end = (skip + count).min(self.total);
        let items: Vec<serde_json::Value> = (skip..end)
            .map(|i| payment_json(&format!("pay_{i}"), &format!("order_{i}"), "captured", "+919876543210"))
            .collect();
        ResponseTemplate::new(200).set_body_json(page(items))
    }
}

/// Answers any order fetch with a prefixed receipt derived from the order id.
struct OrderResponder;

impl Respond for OrderResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let order_id = request.url.path().rsplit('/').next().unwrap_or_default();
        let suffix = order_id.trim_start_matches("order_");
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": order_id,
            "receipt": format!("thaedal_{suffix}")
        }))
    }
}

#[tokio::test]
async fn pagination_stops_after_short_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payments"))
        .respond_with(PaymentListResponder { total: 250 })
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::path_regex(r"^/v1/orders/.+$"))
        .respond_with(OrderResponder)
        .mount(&server)
        .await;

    let (store, _) = InMemoryStore::default().with_user(Some("9876543210"), None);
    let job = ReconcileJob::new(client(&server), &store, options());
    let summary = job.run().await.unwrap();

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.created, 250);
    assert_eq!(store.payments().len(), 250);
}

#[tokio::test]
async fn empty_first_page_finishes_after_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let store = InMemoryStore::default();
    let job = ReconcileJob::new(client(&server), &store, options());
    let summary = job.run().await.unwrap();

    assert_eq!(summary.pages, 1);
    assert_eq!(summary, payment_service::jobs::ReconcileSummary {
        created: 0,
        updated: 0,
        skipped: 0,
        pages: 1,
    });
}

#[tokio::test]
async fn concurrent_run_is_rejected_by_the_lock() {
    let server = MockServer::start().await;
    let store = InMemoryStore::default();
    assert!((&store).try_lock().await.unwrap());

    let job = ReconcileJob::new(client(&server), &store, options());
    let err = job.run().await.unwrap_err();
    assert!(matches!(err, ReconcileError::AlreadyRunning));
}

#[tokio::test]
async fn list_failure_aborts_and_releases_the_lock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let store = InMemoryStore::default();
    let job = ReconcileJob::new(client(&server), &store, options());
    let err = job.run().await.unwrap_err();
    assert!(matches!(err, ReconcileError::Gateway(_)));

    // Lock must be free again for the next invocation.
    assert!((&store).try_lock().await.unwrap());
}
