use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Admin ID
    pub email: String,
    pub role: AdminRole,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    Moderator,
}

impl AdminRole {
    pub fn can_block_users(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin | AdminRole::Admin)
    }

    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin | AdminRole::Admin)
    }

    pub fn can_send_notifications(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin | AdminRole::Admin)
    }
}

#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: String,
    pub email: String,
    pub role: AdminRole,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?
    .claims;

    let current_admin = CurrentAdmin {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    };

    request.extensions_mut().insert(current_admin);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn moderators_are_read_only() {
        let role = AdminRole::Moderator;
        assert!(!role.can_block_users());
        assert!(!role.can_manage_catalog());
        assert!(!role.can_send_notifications());
    }

    #[test]
    fn admins_can_operate_but_roles_differ() {
        assert!(AdminRole::Admin.can_block_users());
        assert!(AdminRole::Admin.can_manage_catalog());
        assert!(AdminRole::Admin.can_send_notifications());
        assert!(AdminRole::SuperAdmin.can_block_users());
    }

    #[test]
    fn claims_survive_encode_decode() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "admin-1".to_string(),
            email: "ops@thaedal.app".to_string(),
            role: AdminRole::Admin,
            iat: now,
            exp: now + 3600,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap()
        .claims;

        assert_eq!(decoded.sub, "admin-1");
        assert_eq!(decoded.role, AdminRole::Admin);
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AdminRole::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
    }
}
