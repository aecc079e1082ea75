//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the StudyHive backend,
//! following Clean Architecture principles. It provides concrete implementations
//! of the repository, identity provider and rate limit traits declared in `hive_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: Postgres pool and repositories using SQLx
//! - **Repositories**: In-memory repositories for deployments without a database
//! - **Identity**: Supabase GoTrue client and an in-memory provider for development
//! - **Cache**: Redis client backing the rate limiter
//! - **Services**: Rate limit stores

// Re-export core types for convenience
pub use hive_core::errors::*;

/// Database module - Postgres implementations using SQLx
pub mod database;

/// In-memory repository implementations
pub mod repositories;

/// Identity provider implementations
pub mod identity;

/// Cache module - Redis client and operations
pub mod cache;

/// Services module - Infrastructure service implementations
pub mod services;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Http(e) => DomainError::upstream(e.to_string()),
            other => DomainError::internal(other.to_string()),
        }
    }
}
