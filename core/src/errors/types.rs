//! Domain-specific error types for authentication and related operations
//!
//! The display strings double as the client facing `error` text of the JSON
//! envelope, so they are kept short and free of internal detail.

use thiserror::Error;

/// Credential verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong password, unknown user, or a wrong/expired one-time code
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// `register/complete` without a live pending registration
    #[error("Registration expired or not found, please register again")]
    RegistrationExpired,

    #[error("User already exists")]
    UserAlreadyExists,
}

/// Token validation and management errors
///
/// Each variant is distinguishable so that clients know whether to refresh
/// (`TokenExpired`) or to sign in again (`InvalidToken`, `InvalidRefreshToken`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Missing or malformed bearer token
    #[error("No token provided")]
    Unauthenticated,

    #[error("Token expired")]
    TokenExpired,

    /// Signature mismatch or unexpected claims
    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    RequiredField { field: String },

    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error("{field} must be at least {min} characters long")]
    InvalidLength { field: String, min: usize },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },
}
