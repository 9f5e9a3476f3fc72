//! Admin account and access token repository implementation.
//!
//! Tokens are opaque bearer secrets: `rv_` plus random charset characters,
//! stored SHA256-hashed with an expiry. Passwords are stored SHA256-hashed.
//! Token validation is a hash lookup joined to the owning admin.

use chrono::{Duration, Utc};
use hex;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use reverb_core::{defaults, new_v7, Admin, Error, Result};

/// PostgreSQL repository for admin accounts and their access tokens.
pub struct PgAdminRepository {
    pool: Pool<Postgres>,
}

impl PgAdminRepository {
    /// Create a new PgAdminRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically secure random string.
    fn generate_secret(length: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }

    /// Hash a secret using SHA256.
    fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a secret against its hash.
    fn verify_secret(secret: &str, hash: &str) -> bool {
        Self::hash_secret(secret) == hash
    }

    /// Create an admin account, hashing the password at rest.
    ///
    /// A duplicate username surfaces as a unique constraint violation from
    /// the database layer.
    pub async fn create(&self, username: &str, password: &str) -> Result<Admin> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"INSERT INTO admin (id, username, password_hash, created_at)
               VALUES ($1, $2, $3, $4)
               RETURNING id, username, password_hash, created_at"#,
        )
        .bind(new_v7())
        .bind(username)
        .bind(Self::hash_secret(password))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(admin)
    }

    /// Total admin accounts.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(count)
    }

    /// Fetch an admin by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"SELECT id, username, password_hash, created_at
               FROM admin WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(admin)
    }

    /// Check a username/password pair, returning the admin when valid.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Admin>> {
        match self.get_by_username(username).await? {
            Some(admin) if Self::verify_secret(password, &admin.password_hash) => Ok(Some(admin)),
            _ => Ok(None),
        }
    }

    /// Issue a new bearer token for an admin, returning the raw secret.
    ///
    /// The raw token is only ever returned here; the table stores its hash.
    pub async fn issue_token(&self, admin_id: Uuid, ttl_minutes: i64) -> Result<String> {
        let token = format!(
            "{}{}",
            defaults::TOKEN_PREFIX,
            Self::generate_secret(defaults::TOKEN_LENGTH)
        );
        let now = Utc::now();

        sqlx::query(
            r#"INSERT INTO access_token (id, admin_id, token_hash, created_at, expires_at)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(new_v7())
        .bind(admin_id)
        .bind(Self::hash_secret(&token))
        .bind(now)
        .bind(now + Duration::minutes(ttl_minutes))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(token)
    }

    /// Resolve a raw bearer token to its admin, if valid and unexpired.
    pub async fn validate_token(&self, token: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"SELECT a.id, a.username, a.password_hash, a.created_at
               FROM access_token t
               JOIN admin a ON a.id = t.admin_id
               WHERE t.token_hash = $1 AND t.expires_at > $2"#,
        )
        .bind(Self::hash_secret(token))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(admin)
    }

    /// Delete expired tokens, returning how many were removed.
    pub async fn cleanup_expired_tokens(&self) -> Result<i64> {
        let result = sqlx::query("DELETE FROM access_token WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_length_and_charset() {
        let secret = PgAdminRepository::generate_secret(48);
        assert_eq!(secret.len(), 48);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_secret_unique() {
        let a = PgAdminRepository::generate_secret(48);
        let b = PgAdminRepository::generate_secret(48);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_secret_is_hex_sha256() {
        let hash = PgAdminRepository::hash_secret("password123");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_secret_round_trip() {
        let hash = PgAdminRepository::hash_secret("correct horse");
        assert!(PgAdminRepository::verify_secret("correct horse", &hash));
        assert!(!PgAdminRepository::verify_secret("wrong horse", &hash));
    }
}
