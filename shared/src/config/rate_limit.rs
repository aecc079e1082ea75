//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::{parse_or, ConfigError};

/// A fixed window: at most `max` requests per `window_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WindowLimit {
    pub window_ms: u64,
    pub max: u32,
}

impl WindowLimit {
    pub fn new(window_ms: u64, max: u32) -> Self {
        Self { window_ms, max }
    }

    /// Window length in whole seconds, never zero
    pub fn window_seconds(&self) -> u64 {
        (self.window_ms / 1000).max(1)
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,

    /// Limit applied to every API request per client IP
    pub api: WindowLimit,

    /// Stricter limit applied to `/auth` requests per client IP
    pub auth: WindowLimit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api: WindowLimit::new(60_000, 60),
            auth: WindowLimit::new(60_000, 10),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            enabled: parse_or(lookup, "RATE_LIMIT_ENABLED", defaults.enabled)?,
            api: WindowLimit {
                window_ms: parse_or(lookup, "RATE_LIMIT_WINDOW_MS", defaults.api.window_ms)?,
                max: parse_or(lookup, "RATE_LIMIT_MAX", defaults.api.max)?,
            },
            auth: WindowLimit {
                window_ms: parse_or(lookup, "AUTH_RATE_LIMIT_WINDOW_MS", defaults.auth.window_ms)?,
                max: parse_or(lookup, "AUTH_RATE_LIMIT_MAX", defaults.auth.max)?,
            },
        })
    }

    /// Configuration with limiting switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_seconds_rounds_down_but_not_to_zero() {
        assert_eq!(WindowLimit::new(60_000, 1).window_seconds(), 60);
        assert_eq!(WindowLimit::new(500, 1).window_seconds(), 1);
    }

    #[test]
    fn test_overrides() {
        let lookup = |key: &str| match key {
            "AUTH_RATE_LIMIT_MAX" => Some("3".to_string()),
            "RATE_LIMIT_ENABLED" => Some("false".to_string()),
            _ => None,
        };
        let config = RateLimitConfig::from_lookup(&lookup).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.auth.max, 3);
        assert_eq!(config.api, WindowLimit::new(60_000, 60));
    }
}
