//! Shared utilities and common types for the StudyHive server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The JSON response envelope
//! - Utility functions (email validation, duration parsing)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    IdentityProviderConfig, JwtConfig, LoggingConfig, RateLimitConfig, RevocationMode,
    ServerConfig, WindowLimit,
};
pub use types::{ApiResponse, HealthResponse};
pub use utils::{duration, validation};
