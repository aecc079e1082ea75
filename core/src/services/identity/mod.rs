//! Boundary to the hosted identity backend that owns credentials.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::identity::{Identity, UserProfile, UserUpdate};
use crate::errors::DomainResult;

/// Credential verification delegated to an external provider
///
/// Implementations report a bad password or a wrong/expired code as
/// `AuthError::InvalidCredentials`, a taken email as `AuthError::UserAlreadyExists`,
/// and any other upstream failure as `DomainError::Upstream`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account with a password
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &UserProfile,
    ) -> DomainResult<Identity>;

    /// Check an email/password pair
    async fn sign_in_with_password(&self, email: &str, password: &str) -> DomainResult<Identity>;

    /// Email a one-time code; `create_user` lets the provider create the account on first use
    async fn send_otp(&self, email: &str, create_user: bool) -> DomainResult<()>;

    /// Check a one-time code previously sent to `email`
    async fn verify_otp(&self, email: &str, code: &str) -> DomainResult<Identity>;

    /// Apply attribute changes to an existing account
    async fn update_user(&self, user_id: Uuid, update: &UserUpdate) -> DomainResult<()>;

    /// Email a password reset link
    async fn send_password_reset(&self, email: &str) -> DomainResult<()>;
}
