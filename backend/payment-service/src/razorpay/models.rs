use serde::Deserialize;

/// A payment as returned by the gateway's list endpoint. Read-only and
/// transient; only `captured` entries are of interest to reconciliation.
#[derive(Debug, Clone, Deserialize)]
pub struct RemotePayment {
    pub id: Option<String>,
    pub order_id: Option<String>,
    pub status: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    /// Amount in minor currency units (paise for INR).
    pub amount: i64,
    pub currency: String,
    pub method: Option<String>,
    /// Unix timestamp of the payment on the gateway side.
    pub created_at: i64,
}

impl RemotePayment {
    pub fn is_captured(&self) -> bool {
        self.status == "captured"
    }
}

/// Gateway order record. `receipt` is the merchant-assigned identifier we
/// join on; orders created by this app carry a fixed receipt prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrder {
    pub id: String,
    pub receipt: Option<String>,
}

/// Envelope for the paginated payments list.
#[derive(Debug, Deserialize)]
pub struct PaymentCollection {
    #[serde(default)]
    pub items: Vec<RemotePayment>,
}
