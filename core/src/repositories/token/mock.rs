//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// Mock token repository for testing
pub struct MockTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
    fail_writes: AtomicBool,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent save fail, to exercise error paths
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Insert a record directly, bypassing the duplicate check
    pub async fn insert(&self, token: RefreshTokenRecord) {
        self.tokens.write().await.insert(token.token_hash.clone(), token);
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Look up a record without consuming it
    pub async fn find_refresh_token(&self, token_hash: &str) -> Option<RefreshTokenRecord> {
        self.tokens.read().await.get(token_hash).cloned()
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

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save_refresh_token(
        &self,
        token: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::internal("storage unavailable"));
        }

        let mut tokens = self.tokens.write().await;

        // Check for duplicate
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
        match tokens.get(token_hash) {
            Some(token) if token.user_id == user_id => {
                tokens.remove(token_hash);
                Ok(true)
            }
            _ => Ok(false),
        }
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
