/// Thaedal OneSignal Push Library
///
/// OneSignal REST client for broadcasting notifications to app audiences.
/// Targeting is a closed set of strategies (`Audience`): whole install base,
/// tag-based subscription segments, or a single user by external id. Each
/// strategy maps to fixed OneSignal segment/filter syntax; there is no
/// free-form filter building.

pub mod audience;
pub mod client;
pub mod errors;
pub mod models;

pub use audience::Audience;
pub use client::OneSignalClient;
pub use errors::OneSignalError;
pub use models::{PushMessage, PushSendResult};
