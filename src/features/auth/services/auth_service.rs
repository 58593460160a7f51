use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginDto, RegisterDto};
use crate::features::auth::models::User;
use crate::features::auth::services::TokenService;

/// Registration and credential verification.
pub struct AuthService {
    pool: PgPool,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    /// Register a new user and issue their first token.
    pub async fn register(&self, dto: RegisterDto) -> Result<AuthResponseDto> {
        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!("User registered: id={}, name={}", user.id, user.name);

        let token = self.tokens.issue(user.id).await?;
        Ok(AuthResponseDto::new(user.into(), token))
    }

    /// Verify credentials and issue a fresh token.
    ///
    /// All existing tokens are revoked on successful login, so each user
    /// has at most one active session.
    pub async fn login(&self, dto: LoginDto) -> Result<AuthResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&dto.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let user = match user {
            Some(u) if verify_password(&dto.password, &u.password_hash) => u,
            _ => {
                return Err(AppError::Validation(
                    "The provided credentials are incorrect.".to_string(),
                ))
            }
        };

        self.tokens.revoke_all(user.id).await?;
        let token = self.tokens.issue(user.id).await?;

        tracing::info!("User logged in: id={}", user.id);

        Ok(AuthResponseDto::new(user.into(), token))
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Map constraint violations to user-facing errors.
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique violation (PostgreSQL error code 23505) on users.email
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Validation("The email has already been taken.".to_string());
        }
    }

    AppError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter2-hunter2").unwrap();
        assert!(verify_password("hunter2-hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("whatever", "not-a-phc-string"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
