//! Cache configuration module

use serde::{Deserialize, Serialize};

use super::non_blank;

/// Redis configuration
///
/// Redis only backs the rate limiter. Without a URL the limiter counts in process.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    #[serde(skip_serializing)]
    pub url: Option<String>,

    /// Key prefix applied to every rate limit key
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            url: non_blank(lookup, "REDIS_URL"),
            key_prefix: non_blank(lookup, "REDIS_KEY_PREFIX"),
        }
    }
}
