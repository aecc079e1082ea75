//! # StudyHive Core
//!
//! Core business logic and domain layer for the StudyHive backend.
//! This crate contains domain entities, business services, repository interfaces,
//! and error types that form the foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Claims, Identity, PendingRegistration, RefreshTokenRecord, SealedSecret, TokenKind, TokenPair,
    UserProfile, UserUpdate,
};
pub use domain::value_objects::{AuthResponse, RefreshResponse, UserView};
pub use errors::*;
pub use repositories::{NoopTokenRepository, PendingRegistrationRepository, TokenRepository};
pub use services::*;
