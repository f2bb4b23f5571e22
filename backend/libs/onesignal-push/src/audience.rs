use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Closed set of push targeting strategies.
///
/// Devices are tagged by the mobile app with `subscription_status`
/// (`free`/`premium`) and `autopay` (`on`/`off`); everything except `All`
/// and `User` resolves to filters over those two tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Audience {
    /// Every subscribed device.
    All,
    /// Users without an active subscription.
    Unsubscribed,
    /// Premium users with autopay enabled.
    PremiumAutopayOn,
    /// Premium users whose autopay is off or lapsed.
    PremiumAutopayOff,
    /// Any user with an active subscription.
    Subscribed,
    /// One user, addressed by the external id set at login.
    User { external_id: String },
}

impl Audience {
    /// Merge this audience's targeting keys into a OneSignal notification
    /// payload. Exactly one of `included_segments`, `filters` or
    /// `include_external_user_ids` is produced.
    pub fn apply_to(&self, payload: &mut serde_json::Map<String, Value>) {
        match self {
            Audience::All => {
                payload.insert("included_segments".into(), json!(["All"]));
            }
            Audience::Unsubscribed => {
                payload.insert(
                    "filters".into(),
                    json!([tag_filter("subscription_status", "free")]),
                );
            }
            Audience::PremiumAutopayOn => {
                payload.insert(
                    "filters".into(),
                    json!([
                        tag_filter("subscription_status", "premium"),
                        tag_filter("autopay", "on"),
                    ]),
                );
            }
            Audience::PremiumAutopayOff => {
                payload.insert(
                    "filters".into(),
                    json!([
                        tag_filter("subscription_status", "premium"),
                        tag_filter("autopay", "off"),
                    ]),
                );
            }
            Audience::Subscribed => {
                payload.insert(
                    "filters".into(),
                    json!([tag_filter("subscription_status", "premium")]),
                );
            }
            Audience::User { external_id } => {
                payload.insert("include_external_user_ids".into(), json!([external_id]));
            }
        }
    }
}

fn tag_filter(key: &str, value: &str) -> Value {
    json!({"field": "tag", "key": key, "relation": "=", "value": value})
}
