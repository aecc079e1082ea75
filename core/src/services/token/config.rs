//! Configuration for the token service

use hive_shared::config::{AuthConfig, JwtConfig, RevocationMode};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Secret signing access tokens
    pub access_secret: String,
    /// Secret signing refresh tokens
    pub refresh_secret: String,
    /// Access token lifetime in seconds
    pub access_expiry_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_expiry_seconds: i64,
    /// Value of the `iss` claim, checked on every decode
    pub issuer: String,
    pub revocation: RevocationMode,
}

impl TokenServiceConfig {
    pub fn from_jwt(jwt: &JwtConfig, revocation: RevocationMode) -> Self {
        Self {
            access_secret: jwt.access_secret.clone(),
            refresh_secret: jwt.refresh_secret.clone(),
            access_expiry_seconds: jwt.access_expiry_seconds,
            refresh_expiry_seconds: jwt.refresh_expiry_seconds,
            issuer: jwt.issuer.clone(),
            revocation,
        }
    }

    pub fn with_revocation(mut self, revocation: RevocationMode) -> Self {
        self.revocation = revocation;
        self
    }
}

impl From<&AuthConfig> for TokenServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self::from_jwt(&config.jwt, config.revocation)
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from_jwt(&JwtConfig::default(), RevocationMode::default())
    }
}
