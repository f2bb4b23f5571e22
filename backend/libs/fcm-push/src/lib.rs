/// Thaedal FCM Push Library
///
/// Firebase Cloud Messaging (HTTP v1) client for sending push notifications
/// to devices by registration token.
///
/// It handles:
/// - OAuth2 token generation using Google service accounts
/// - Token caching with automatic refresh
/// - Single and multicast message delivery
/// - Device token validation

pub mod client;
pub mod errors;
pub mod models;

pub use client::FcmClient;
pub use errors::FcmError;
pub use models::{FcmSendResult, MulticastSendResult, ServiceAccountKey};
