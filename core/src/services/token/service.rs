//! Main token service implementation

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use hive_shared::config::RevocationMode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::{Claims, RefreshTokenRecord, TokenKind, TokenPair};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Signing material for one token kind
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues, verifies and rotates token pairs.
///
/// Access tokens are never stored. In [`RevocationMode::Persisted`] every refresh
/// token has a hashed record in the repository and is consumed on use.
pub struct TokenService<R: TokenRepository + ?Sized> {
    pub(crate) repository: Arc<R>,
    config: TokenServiceConfig,
    access_keys: KeyPair,
    refresh_keys: KeyPair,
    validation: Validation,
}

impl<R: TokenRepository + ?Sized> TokenService<R> {
    /// Creates a new token service instance
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            repository,
            access_keys: KeyPair::from_secret(&config.access_secret),
            refresh_keys: KeyPair::from_secret(&config.refresh_secret),
            config,
            validation,
        }
    }

    /// Generates a new token pair for a verified identity
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The generated token pair
    /// * `Err(TokenGenerationFailed)` - Signing or persisting the refresh record failed
    pub async fn issue(&self, identity: &Identity) -> DomainResult<TokenPair> {
        let now = Utc::now();
        let access_token = self.sign(identity, TokenKind::Access, now)?;
        let refresh_token = self.sign(identity, TokenKind::Refresh, now)?;

        if self.config.revocation == RevocationMode::Persisted {
            let record = RefreshTokenRecord::new(
                identity.id,
                Self::hash_token(&refresh_token),
                now + Duration::seconds(self.config.refresh_expiry_seconds),
            );

            self.repository
                .save_refresh_token(record)
                .await
                .map_err(|e| {
                    warn!(user_id = %identity.id, error = %e, "Failed to persist refresh token");
                    DomainError::Token(TokenError::TokenGenerationFailed)
                })?;
        }

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_expiry_seconds,
            self.config.refresh_expiry_seconds,
        ))
    }

    /// Verifies an access token and returns the identity it was issued for
    ///
    /// Only the signature, expiry, issuer and token kind are checked; no storage
    /// is consulted.
    pub fn verify_access_token(&self, token: &str) -> DomainResult<Identity> {
        if token.trim().is_empty() {
            return Err(TokenError::Unauthenticated.into());
        }

        let claims = self
            .decode(token, TokenKind::Access)
            .map_err(|kind| DomainError::Token(Self::classify_access_error(&kind)))?;

        if claims.typ != TokenKind::Access {
            return Err(TokenError::InvalidToken.into());
        }

        claims
            .identity()
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))
    }

    /// Exchanges a refresh token for a new pair (rotation)
    ///
    /// In persisted mode the stored record is consumed atomically before the new
    /// pair is issued, so a given refresh token succeeds at most once.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self
            .decode(refresh_token, TokenKind::Refresh)
            .map_err(|kind| {
                debug!(?kind, "Refresh token rejected");
                DomainError::Token(TokenError::InvalidRefreshToken)
            })?;

        if claims.typ != TokenKind::Refresh {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let identity = claims
            .identity()
            .map_err(|_| DomainError::Token(TokenError::InvalidRefreshToken))?;

        if self.config.revocation == RevocationMode::Persisted {
            let token_hash = Self::hash_token(refresh_token);

            // Consuming first means a concurrent refresh of the same token finds nothing
            let record = self
                .repository
                .take_refresh_token(&token_hash)
                .await?
                .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

            if record.is_expired() || record.user_id != identity.id {
                warn!(user_id = %identity.id, "Refresh token record expired or owned by another user");
                return Err(TokenError::InvalidRefreshToken.into());
            }
        }

        self.issue(&identity).await
    }

    /// Deletes one refresh token record of the user
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The record existed, belonged to the user and was removed
    /// * `Ok(false)` - Nothing was removed (always the case in stateless mode)
    pub async fn revoke_refresh_token(&self, user_id: Uuid, token: &str) -> DomainResult<bool> {
        if self.config.revocation == RevocationMode::Stateless {
            return Ok(false);
        }

        self.repository
            .delete_user_token(user_id, &Self::hash_token(token))
            .await
    }

    /// Deletes every refresh token record of the user
    pub async fn revoke_all(&self, user_id: Uuid) -> DomainResult<usize> {
        if self.config.revocation == RevocationMode::Stateless {
            return Ok(0);
        }

        self.repository.delete_all_user_tokens(user_id).await
    }

    /// SHA-256 hex digest used as the storage key of a refresh token
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Signs claims of `kind` for `identity`, issued at `now`
    pub(crate) fn sign(
        &self,
        identity: &Identity,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> DomainResult<String> {
        let (keys, lifetime) = match kind {
            TokenKind::Access => (&self.access_keys, self.config.access_expiry_seconds),
            TokenKind::Refresh => (&self.refresh_keys, self.config.refresh_expiry_seconds),
        };

        let claims = Claims::new(identity, kind, &self.config.issuer, now, Duration::seconds(lifetime));
        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    fn decode(&self, token: &str, kind: TokenKind) -> Result<Claims, ErrorKind> {
        let keys = match kind {
            TokenKind::Access => &self.access_keys,
            TokenKind::Refresh => &self.refresh_keys,
        };

        decode::<Claims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| e.into_kind())
    }

    fn classify_access_error(kind: &ErrorKind) -> TokenError {
        match kind {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            // Not a JWT at all
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                TokenError::Unauthenticated
            }
            _ => TokenError::InvalidToken,
        }
    }
}
