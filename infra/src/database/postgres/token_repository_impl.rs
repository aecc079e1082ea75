//! Postgres implementation of the TokenRepository trait.
//!
//! Refresh token records are keyed by the SHA-256 hex of the token. Consumption
//! on refresh is a single `DELETE ... RETURNING`, so two concurrent refreshes of
//! the same token cannot both see the row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use hive_core::domain::entities::token::RefreshTokenRecord;
use hive_core::errors::DomainError;
use hive_core::repositories::TokenRepository;

use super::db_error;

const COLUMNS: &str = "id, user_id, token_hash, created_at, expires_at";

/// Postgres implementation of TokenRepository
pub struct PgTokenRepository {
    /// Database connection pool
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshTokenRecord entity
    fn row_to_token(row: &PgRow) -> Result<RefreshTokenRecord, DomainError> {
        let field = |name: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", name, e),
        };

        Ok(RefreshTokenRecord {
            id: row.try_get::<Uuid, _>("id").map_err(|e| field("id", e))?,
            user_id: row.try_get::<Uuid, _>("user_id").map_err(|e| field("user_id", e))?,
            token_hash: row
                .try_get::<String, _>("token_hash")
                .map_err(|e| field("token_hash", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| field("created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| field("expires_at", e))?,
        })
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn save_refresh_token(
        &self,
        token: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
        "#;

        let result = sqlx::query(query)
            .bind(token.id)
            .bind(token.user_id)
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(token.expires_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(token),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            }),
            Err(e) => Err(db_error("Failed to save refresh token", e)),
        }
    }

    async fn take_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = format!(
            "DELETE FROM refresh_tokens WHERE token_hash = $1 RETURNING {}",
            COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to consume refresh token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn delete_user_token(&self, user_id: Uuid, token_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1 AND user_id = $2")
            .bind(token_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete refresh token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete user tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired_tokens(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete expired tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
