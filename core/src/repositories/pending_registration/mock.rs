//! Mock implementation of PendingRegistrationRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::pending_registration::PendingRegistration;
use crate::errors::DomainError;

use super::r#trait::PendingRegistrationRepository;

#[derive(Default)]
pub struct MockPendingRegistrationRepository {
    records: Arc<RwLock<HashMap<String, PendingRegistration>>>,
}

impl MockPendingRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl PendingRegistrationRepository for MockPendingRegistrationRepository {
    async fn upsert(&self, registration: PendingRegistration) -> Result<(), DomainError> {
        self.records
            .write()
            .await
            .insert(registration.email.clone(), registration);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<PendingRegistration>, DomainError> {
        Ok(self.records.read().await.get(email).cloned())
    }

    async fn delete(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.records.write().await.remove(email).is_some())
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| !r.is_expired());
        Ok(before - records.len())
    }
}
