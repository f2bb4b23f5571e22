use thiserror::Error;

/// SMS Gateway Error Types
#[derive(Error, Debug)]
pub enum SmsError {
    #[error("SMS send request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("SMS provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("SMS gateway misconfigured: {0}")]
    Misconfigured(String),
}
