mod auth;

pub use auth::{require_auth, AdminRole, Claims, CurrentAdmin};
