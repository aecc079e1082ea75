//! No-op implementation of TokenRepository for stateless revocation mode

use async_trait::async_trait;
use uuid::Uuid;

use super::TokenRepository;
use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Repository that stores nothing.
///
/// Used when refresh tokens are not tracked server-side. Every take misses
/// and every delete reports zero rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTokenRepository;

impl NoopTokenRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TokenRepository for NoopTokenRepository {
    async fn save_refresh_token(
        &self,
        token: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, DomainError> {
        Ok(token)
    }

    async fn take_refresh_token(
        &self,
        _token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        Ok(None)
    }

    async fn delete_user_token(&self, _user_id: Uuid, _token_hash: &str) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn delete_all_user_tokens(&self, _user_id: Uuid) -> Result<usize, DomainError> {
        Ok(0)
    }

    async fn delete_expired_tokens(&self) -> Result<usize, DomainError> {
        Ok(0)
    }
}
