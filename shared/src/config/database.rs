//! Database configuration module

use serde::{Deserialize, Serialize};

use super::{non_blank, parse_or, ConfigError};

/// Database configuration for PostgreSQL connections
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL, `None` selects the in-memory stores
    #[serde(skip_serializing)]
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    pub max_lifetime: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connect_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
        }
    }
}

impl DatabaseConfig {
    /// Create a configuration pointing at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            url: non_blank(lookup, "DATABASE_URL"),
            max_connections: parse_or(lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            connect_timeout: parse_or(lookup, "DATABASE_CONNECT_TIMEOUT", defaults.connect_timeout)?,
            idle_timeout: parse_or(lookup, "DATABASE_IDLE_TIMEOUT", defaults.idle_timeout)?,
            max_lifetime: parse_or(lookup, "DATABASE_MAX_LIFETIME", defaults.max_lifetime)?,
        })
    }

    /// Set the maximum number of pooled connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}
