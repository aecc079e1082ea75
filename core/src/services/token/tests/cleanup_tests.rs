use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::pending_registration::{PendingRegistration, SealedSecret};
use crate::domain::entities::identity::UserProfile;
use crate::domain::entities::token::RefreshTokenRecord;
use crate::repositories::{
    MockPendingRegistrationRepository, MockTokenRepository, PendingRegistrationRepository,
};
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};
use hive_shared::config::{AuthConfig, RevocationMode};

fn pending(email: &str, ttl: Duration) -> PendingRegistration {
    let sealed = SealedSecret {
        ciphertext: String::new(),
        nonce: String::new(),
    };
    PendingRegistration::new(email, sealed, UserProfile::default(), ttl)
}

#[tokio::test]
async fn test_cleanup_removes_only_expired_records() {
    let tokens = Arc::new(MockTokenRepository::new());
    let pending_repo = Arc::new(MockPendingRegistrationRepository::new());
    let user_id = Uuid::new_v4();

    tokens
        .insert(RefreshTokenRecord::new(user_id, "live".into(), Utc::now() + Duration::days(1)))
        .await;
    tokens
        .insert(RefreshTokenRecord::new(user_id, "stale".into(), Utc::now() - Duration::days(1)))
        .await;
    pending_repo.upsert(pending("a@x.com", Duration::minutes(15))).await.unwrap();
    pending_repo.upsert(pending("b@x.com", Duration::seconds(-1))).await.unwrap();

    let service = TokenCleanupService::new(tokens.clone(), pending_repo.clone(), TokenCleanupConfig::default());
    let result = service.run_cleanup().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.expired_tokens_deleted, 1);
    assert_eq!(result.pending_registrations_deleted, 1);
    assert_eq!(result.total_cleaned(), 2);
    assert_eq!(tokens.len().await, 1);
    assert!(pending_repo.find_by_email("a@x.com").await.unwrap().is_some());
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let tokens = Arc::new(MockTokenRepository::new());
    tokens
        .insert(RefreshTokenRecord::new(Uuid::new_v4(), "stale".into(), Utc::now() - Duration::days(1)))
        .await;

    let config = TokenCleanupConfig {
        enabled: false,
        ..Default::default()
    };
    let service = TokenCleanupService::new(
        tokens.clone(),
        Arc::new(MockPendingRegistrationRepository::new()),
        config,
    );

    assert_eq!(service.run_cleanup().await.unwrap().total_cleaned(), 0);
    assert_eq!(tokens.len().await, 1);
}

#[tokio::test]
async fn test_stateless_mode_still_sweeps_pending_registrations() {
    let tokens = Arc::new(MockTokenRepository::new());
    tokens
        .insert(RefreshTokenRecord::new(Uuid::new_v4(), "stale".into(), Utc::now() - Duration::days(1)))
        .await;
    let pending_repo = Arc::new(MockPendingRegistrationRepository::new());
    pending_repo.upsert(pending("b@x.com", Duration::seconds(-1))).await.unwrap();

    let auth = AuthConfig {
        revocation: RevocationMode::Stateless,
        ..AuthConfig::default()
    };
    let config = TokenCleanupConfig::from(&auth);
    assert!(config.enabled);
    assert!(!config.sweep_tokens);

    let service = TokenCleanupService::new(tokens.clone(), pending_repo.clone(), config);
    let result = service.run_cleanup().await.unwrap();

    assert_eq!(result.pending_registrations_deleted, 1);
    assert_eq!(result.expired_tokens_deleted, 0);
    assert!(pending_repo.find_by_email("b@x.com").await.unwrap().is_none());
    assert_eq!(tokens.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_interval() {
    let tokens = Arc::new(MockTokenRepository::new());
    tokens
        .insert(RefreshTokenRecord::new(Uuid::new_v4(), "stale".into(), Utc::now() - Duration::days(1)))
        .await;

    let config = TokenCleanupConfig {
        interval_seconds: 60,
        ..Default::default()
    };
    let service = Arc::new(TokenCleanupService::new(
        tokens.clone(),
        Arc::new(MockPendingRegistrationRepository::new()),
        config,
    ));
    service.start_background_task();

    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    assert_eq!(tokens.len().await, 0);
}
