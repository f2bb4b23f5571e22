use thiserror::Error;

/// FCM Client Error Types
#[derive(Error, Debug)]
pub enum FcmError {
    #[error("Failed to parse private key: {0}")]
    KeyParse(String),

    #[error("Failed to encode JWT: {0}")]
    JwtEncode(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Token request failed with status: {0}")]
    TokenStatus(u16),

    #[error("FCM API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Invalid device token")]
    InvalidToken,
}
