//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `auth` - Token signing, revocation and pending registration settings
//! - `cache` - Redis connection used by the rate limiter
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `identity` - Hosted auth provider credentials
//! - `rate_limit` - Per-IP request limits
//! - `server` - HTTP server and CORS configuration
//!
//! Every sub-configuration exposes `from_env()` plus a `from_lookup()` variant that
//! reads through an arbitrary key lookup, which keeps parsing testable without
//! touching the process environment.

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod identity;
pub mod rate_limit;
pub mod server;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, RevocationMode};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use identity::IdentityProviderConfig;
pub use rate_limit::{RateLimitConfig, WindowLimit};
pub use server::{CorsConfig, ServerConfig};

/// Errors raised while loading or validating configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("{key} must be set in {environment}")]
    Missing { key: String, environment: Environment },

    #[error("{key} still uses the development default, refusing to start in {environment}")]
    InsecureDefault { key: String, environment: Environment },
}

/// Reads `key` through `lookup` and parses it, falling back to `default` when unset
/// or blank. Unparsable values are reported rather than silently replaced.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match non_blank(lookup, key) {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Reads `key` and returns it only when it carries a non-whitespace value
pub(crate) fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Token and registration configuration
    pub auth: AuthConfig,

    /// Hosted auth provider configuration
    pub identity: IdentityProviderConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup);

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(&lookup)?,
            cors: CorsConfig::from_lookup(&lookup),
            database: DatabaseConfig::from_lookup(&lookup)?,
            cache: CacheConfig::from_lookup(&lookup),
            auth: AuthConfig::from_lookup(&lookup)?,
            identity: IdentityProviderConfig::from_lookup(&lookup)?,
            rate_limit: RateLimitConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(&lookup, environment),
        })
    }

    /// Check the settings that must not keep their development defaults outside
    /// of development
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.environment.is_production() {
            return Ok(());
        }

        if self.auth.jwt.is_using_default_access_secret() {
            return Err(ConfigError::InsecureDefault {
                key: "JWT_SECRET".to_string(),
                environment: self.environment,
            });
        }
        if self.auth.jwt.is_using_default_refresh_secret() {
            return Err(ConfigError::InsecureDefault {
                key: "JWT_REFRESH_SECRET".to_string(),
                environment: self.environment,
            });
        }
        if !self.identity.is_configured() {
            return Err(ConfigError::Missing {
                key: "SUPABASE_URL".to_string(),
                environment: self.environment,
            });
        }
        if self.auth.revocation == RevocationMode::Persisted && self.database.url.is_none() {
            return Err(ConfigError::Missing {
                key: "DATABASE_URL".to_string(),
                environment: self.environment,
            });
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
