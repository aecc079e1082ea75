//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Repository trait for refresh token records
///
/// Records are keyed by the SHA-256 hex digest of the token; the raw token
/// never reaches storage.
///
/// # Concurrency
/// `take_refresh_token` must be atomic: of two concurrent calls for the same
/// hash at most one may observe `Some`. Rotation relies on this to make every
/// refresh token single use.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token record
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The saved record
    /// * `Err(DomainError)` - Save failed (e.g., duplicate hash)
    async fn save_refresh_token(
        &self,
        token: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, DomainError>;

    /// Atomically delete and return the record for `token_hash`
    ///
    /// # Returns
    /// * `Ok(Some(record))` - This caller consumed the record
    /// * `Ok(None)` - No such record, or another caller consumed it first
    async fn take_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Delete one record, only if it belongs to `user_id`
    ///
    /// # Returns
    /// * `Ok(true)` - Record deleted
    /// * `Ok(false)` - Not found or owned by another user
    async fn delete_user_token(&self, user_id: Uuid, token_hash: &str) -> Result<bool, DomainError>;

    /// Delete every record of a user, returning how many were removed
    async fn delete_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete expired records
    ///
    /// This method should be called periodically to clean up expired tokens.
    async fn delete_expired_tokens(&self) -> Result<usize, DomainError>;
}
