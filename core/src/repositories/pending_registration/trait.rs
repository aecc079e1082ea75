//! Storage for registrations awaiting OTP confirmation.

use async_trait::async_trait;

use crate::domain::entities::pending_registration::PendingRegistration;
use crate::errors::DomainError;

/// Repository trait for pending registrations, keyed by normalized email
#[async_trait]
pub trait PendingRegistrationRepository: Send + Sync {
    /// Insert or replace the pending registration for its email
    async fn upsert(&self, registration: PendingRegistration) -> Result<(), DomainError>;

    /// Find the pending registration for `email`, expired or not
    async fn find_by_email(&self, email: &str) -> Result<Option<PendingRegistration>, DomainError>;

    /// Delete the pending registration for `email`
    ///
    /// # Returns
    /// * `Ok(true)` - A record was deleted
    /// * `Ok(false)` - There was nothing to delete
    async fn delete(&self, email: &str) -> Result<bool, DomainError>;

    /// Delete every expired pending registration
    async fn delete_expired(&self) -> Result<usize, DomainError>;
}
