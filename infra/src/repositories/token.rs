use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use hive_core::domain::entities::token::RefreshTokenRecord;
use hive_core::errors::DomainError;
use hive_core::repositories::TokenRepository;

/// Refresh token records held in a map behind an async lock.
///
/// `take_refresh_token` removes under the write lock, which gives the same
/// single-consumer guarantee as `DELETE ... RETURNING`.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    pub async fn contains(&self, token_hash: &str) -> bool {
        self.tokens.read().await.contains_key(token_hash)
    }

    /// Unexpired records of a user
    pub async fn count_user_tokens(&self, user_id: Uuid) -> usize {
        self.tokens
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id && !t.is_expired())
            .count()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn save_refresh_token(
        &self,
        token: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, DomainError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn take_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        Ok(self.tokens.write().await.remove(token_hash))
    }

    async fn delete_user_token(&self, user_id: Uuid, token_hash: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        if tokens.get(token_hash).map(|t| t.user_id) == Some(user_id) {
            tokens.remove(token_hash);
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != user_id);
        Ok(before - tokens.len())
    }

    async fn delete_expired_tokens(&self) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired());
        Ok(before - tokens.len())
    }
}
