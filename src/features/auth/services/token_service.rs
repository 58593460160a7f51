use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::models::AuthenticatedUser;
use crate::shared::constants::ACCESS_TOKEN_LENGTH;

/// Issues and verifies opaque bearer tokens.
///
/// The plaintext token is returned to the client exactly once; only its
/// SHA-256 digest is stored, so a leaked table cannot be replayed.
pub struct TokenService {
    pool: PgPool,
}

impl TokenService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issue a fresh token for a user, returning the plaintext.
    pub async fn issue(&self, user_id: Uuid) -> Result<String> {
        let plain = generate_plain_token();
        let digest = hash_token(&plain);

        sqlx::query("INSERT INTO access_tokens (user_id, token_hash) VALUES ($1, $2)")
            .bind(user_id)
            .bind(&digest)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to issue access token: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(plain)
    }

    /// Resolve a presented plaintext token to its user.
    pub async fn authenticate(&self, plain: &str) -> Result<AuthenticatedUser> {
        let digest = hash_token(plain);

        let user = sqlx::query_as::<_, AuthenticatedUser>(
            r#"
            SELECT u.id, u.name, u.email, t.id AS token_id
            FROM access_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(&digest)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up access token: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        sqlx::query("UPDATE access_tokens SET last_used_at = NOW() WHERE id = $1")
            .bind(user.token_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(user)
    }

    /// Revoke a single token (logout from the current session).
    pub async fn revoke(&self, token_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM access_tokens WHERE id = $1")
            .bind(token_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }

    /// Revoke every token a user holds, returning how many were removed.
    pub async fn revoke_all(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}

fn generate_plain_token() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ACCESS_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub(crate) fn hash_token(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_and_sized() {
        let a = generate_plain_token();
        let b = generate_plain_token();
        assert_eq!(a.len(), ACCESS_TOKEN_LENGTH);
        assert_eq!(b.len(), ACCESS_TOKEN_LENGTH);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_token_digest_is_stable_sha256_hex() {
        let digest = hash_token("abc");
        assert_eq!(digest, hash_token("abc"));
        assert_eq!(digest.len(), 64);
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
