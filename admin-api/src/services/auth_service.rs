// Auth service - credential checks, lockout bookkeeping and JWT issuance
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::middleware::Claims;
use crate::models::Admin;

pub struct AuthService {
    db: Database,
    config: Config,
}

impl AuthService {
    pub fn new(db: Database, config: Config) -> Self {
        Self { db, config }
    }

    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Admin, String, String)> {
        let admin: Admin =
            sqlx::query_as("SELECT * FROM admins WHERE email = $1 AND status = 'active'")
                .bind(email)
                .fetch_optional(&self.db.pg)
                .await?
                .ok_or(AppError::Unauthorized)?;

        if let Some(locked_until) = admin.locked_until {
            if locked_until > Utc::now() {
                let formatted_time = locked_until.format("%Y-%m-%d %H:%M:%S UTC").to_string();
                return Err(AppError::AccountLocked(formatted_time));
            }
            // Lock has expired, clear it
            sqlx::query("UPDATE admins SET locked_until = NULL, login_attempts = 0 WHERE id = $1")
                .bind(admin.id)
                .execute(&self.db.pg)
                .await?;
        }

        if verify_password(password, &admin.password_hash).is_err() {
            let new_attempts = admin.login_attempts + 1;

            if new_attempts >= self.config.security.max_login_attempts {
                let lock_until =
                    Utc::now() + Duration::minutes(self.config.security.lockout_duration_minutes);
                sqlx::query(
                    "UPDATE admins SET login_attempts = $1, locked_until = $2 WHERE id = $3",
                )
                .bind(new_attempts)
                .bind(lock_until)
                .bind(admin.id)
                .execute(&self.db.pg)
                .await?;
                let formatted_time = lock_until.format("%Y-%m-%d %H:%M:%S UTC").to_string();
                return Err(AppError::AccountLocked(formatted_time));
            } else {
                sqlx::query("UPDATE admins SET login_attempts = $1 WHERE id = $2")
                    .bind(new_attempts)
                    .bind(admin.id)
                    .execute(&self.db.pg)
                    .await?;
            }
            return Err(AppError::Unauthorized);
        }

        let access_token = self.generate_access_token(&admin)?;
        let refresh_token = self.generate_refresh_token(&admin)?;

        // Reset attempts, clear any lock and stamp the login on success
        sqlx::query(
            "UPDATE admins SET last_login_at = NOW(), login_attempts = 0, locked_until = NULL WHERE id = $1",
        )
        .bind(admin.id)
        .execute(&self.db.pg)
        .await?;

        Ok((admin, access_token, refresh_token))
    }

    pub fn generate_access_token(&self, admin: &Admin) -> Result<String> {
        issue_token(
            admin,
            &self.config.jwt.secret,
            Duration::hours(self.config.jwt.expiry_hours as i64),
        )
    }

    pub fn generate_refresh_token(&self, admin: &Admin) -> Result<String> {
        issue_token(admin, &self.config.jwt.secret, Duration::days(30))
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<()> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)
}

pub fn issue_token(admin: &Admin, secret: &str, ttl: Duration) -> Result<String> {
    let now = Utc::now();
    let exp = now + ttl;

    let claims = Claims {
        sub: admin.id.to_string(),
        email: admin.email.clone(),
        role: admin.role(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::AdminRole;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use uuid::Uuid;

    fn admin(role: &str) -> Admin {
        Admin {
            id: Uuid::new_v4(),
            email: "ops@thaedal.app".to_string(),
            password_hash: String::new(),
            name: "Ops".to_string(),
            role: role.to_string(),
            status: "active".to_string(),
            login_attempts: 0,
            locked_until: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("S3cure!pass").unwrap();
        assert!(verify_password("S3cure!pass", &hash).is_ok());
        assert!(verify_password("wrong", &hash).is_err());
    }

    #[test]
    fn issued_token_carries_role_and_subject() {
        let admin = admin("super_admin");
        let token = issue_token(&admin, "test-secret", Duration::hours(1)).unwrap();

        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap()
        .claims;

        assert_eq!(claims.sub, admin.id.to_string());
        assert_eq!(claims.role, AdminRole::SuperAdmin);
    }

    #[test]
    fn unknown_role_string_falls_back_to_moderator() {
        assert_eq!(admin("viewer").role(), AdminRole::Moderator);
        assert_eq!(admin("admin").role(), AdminRole::Admin);
    }
}
