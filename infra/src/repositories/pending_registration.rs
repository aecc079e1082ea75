use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use hive_core::domain::entities::pending_registration::PendingRegistration;
use hive_core::errors::DomainError;
use hive_core::repositories::PendingRegistrationRepository;

/// Pending registrations keyed by normalized email
#[derive(Default)]
pub struct InMemoryPendingRegistrationRepository {
    records: RwLock<HashMap<String, PendingRegistration>>,
}

impl InMemoryPendingRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PendingRegistrationRepository for InMemoryPendingRegistrationRepository {
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
