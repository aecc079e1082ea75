//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Access and refresh token issuance (HS256, distinct secrets)
//! - Access token verification
//! - Refresh token rotation with single-use consumption
//! - Background cleanup of expired records

mod cleanup;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::TokenServiceConfig;
pub use service::TokenService;
