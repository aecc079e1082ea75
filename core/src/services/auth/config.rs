//! Configuration for the authentication service

use chrono::Duration;
use hive_shared::config::AuthConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// How long a `register/init` stays redeemable
    pub pending_registration_ttl: Duration,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            pending_registration_ttl: Duration::minutes(15),
        }
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            pending_registration_ttl: Duration::seconds(config.pending_registration_ttl_seconds),
        }
    }
}
