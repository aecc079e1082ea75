//! Postgres implementation of the PendingRegistrationRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

use hive_core::domain::entities::identity::UserProfile;
use hive_core::domain::entities::pending_registration::{PendingRegistration, SealedSecret};
use hive_core::errors::DomainError;
use hive_core::repositories::PendingRegistrationRepository;

use super::db_error;

pub struct PgPendingRegistrationRepository {
    pool: PgPool,
}

impl PgPendingRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_registration(row: &PgRow) -> Result<PendingRegistration, DomainError> {
        let read = || -> Result<PendingRegistration, sqlx::Error> {
            Ok(PendingRegistration {
                email: row.try_get("email")?,
                sealed_password: SealedSecret {
                    ciphertext: row.try_get("password_ciphertext")?,
                    nonce: row.try_get("password_nonce")?,
                },
                profile: UserProfile {
                    first_name: row.try_get("first_name")?,
                    last_name: row.try_get("last_name")?,
                },
                created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
                expires_at: row.try_get::<DateTime<Utc>, _>("expires_at")?,
            })
        };

        read().map_err(|e| DomainError::Internal {
            message: format!("Failed to read pending registration: {}", e),
        })
    }
}

#[async_trait]
impl PendingRegistrationRepository for PgPendingRegistrationRepository {
    async fn upsert(&self, registration: PendingRegistration) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO pending_registrations (
                email, password_ciphertext, password_nonce, first_name, last_name, created_at, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email) DO UPDATE SET
                password_ciphertext = EXCLUDED.password_ciphertext,
                password_nonce = EXCLUDED.password_nonce,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                created_at = EXCLUDED.created_at,
                expires_at = EXCLUDED.expires_at
        "#;

        sqlx::query(query)
            .bind(&registration.email)
            .bind(&registration.sealed_password.ciphertext)
            .bind(&registration.sealed_password.nonce)
            .bind(&registration.profile.first_name)
            .bind(&registration.profile.last_name)
            .bind(registration.created_at)
            .bind(registration.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to save pending registration", e))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<PendingRegistration>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT email, password_ciphertext, password_nonce, first_name, last_name, created_at, expires_at
            FROM pending_registrations
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find pending registration", e))?;

        row.as_ref().map(Self::row_to_registration).transpose()
    }

    async fn delete(&self, email: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM pending_registrations WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete pending registration", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM pending_registrations WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete expired pending registrations", e))?;

        Ok(result.rows_affected() as usize)
    }
}
