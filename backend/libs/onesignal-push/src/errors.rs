use thiserror::Error;

/// OneSignal Client Error Types
#[derive(Error, Debug)]
pub enum OneSignalError {
    #[error("OneSignal request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OneSignal API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("OneSignal rejected the notification: {0}")]
    Rejected(String),
}
