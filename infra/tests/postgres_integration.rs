//! Postgres repository tests
//!
//! These tests require a database reachable through DATABASE_URL.
//! Run with: cargo test --test postgres_integration -- --ignored

use chrono::{Duration, Utc};
use uuid::Uuid;

use hive_core::domain::entities::identity::UserProfile;
use hive_core::domain::entities::pending_registration::{PendingRegistration, SealedSecret};
use hive_core::domain::entities::token::RefreshTokenRecord;
use hive_core::repositories::{PendingRegistrationRepository, TokenRepository};
use hive_infra::database::{DatabasePool, PgPendingRegistrationRepository, PgTokenRepository};
use hive_shared::config::DatabaseConfig;

async fn pool() -> DatabasePool {
    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL").ok(),
        ..Default::default()
    };
    let pool = DatabasePool::new(config).await.expect("database should be reachable");
    pool.run_migrations().await.expect("migrations should apply");
    pool
}

fn unique_hash() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_refresh_token_lifecycle() {
    let pool = pool().await;
    let repo = PgTokenRepository::new(pool.get_pool().clone());
    let user = Uuid::new_v4();
    let hash = unique_hash();

    repo.save_refresh_token(RefreshTokenRecord::new(user, hash.clone(), Utc::now() + Duration::days(7)))
        .await
        .unwrap();

    // Duplicate hashes are rejected
    assert!(repo
        .save_refresh_token(RefreshTokenRecord::new(user, hash.clone(), Utc::now() + Duration::days(7)))
        .await
        .is_err());

    assert!(repo.take_refresh_token(&hash).await.unwrap().is_some());
    assert!(repo.take_refresh_token(&hash).await.unwrap().is_none());

    // Another session is removed by a logout of every session
    repo.save_refresh_token(RefreshTokenRecord::new(user, unique_hash(), Utc::now() + Duration::days(7)))
        .await
        .unwrap();
    assert_eq!(repo.delete_all_user_tokens(user).await.unwrap(), 1);
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_pending_registration_upsert() {
    let pool = pool().await;
    let repo = PgPendingRegistrationRepository::new(pool.get_pool().clone());
    let email = format!("{}@uni.edu", Uuid::new_v4().simple());

    let sealed = SealedSecret {
        ciphertext: "c2VhbGVk".to_string(),
        nonce: "bm9uY2U=".to_string(),
    };
    repo.upsert(PendingRegistration::new(&email, sealed.clone(), UserProfile::default(), Duration::minutes(15)))
        .await
        .unwrap();

    let profile = UserProfile {
        first_name: Some("Ada".to_string()),
        last_name: None,
    };
    repo.upsert(PendingRegistration::new(&email, sealed, profile, Duration::minutes(15)))
        .await
        .unwrap();

    let stored = repo.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(stored.profile.first_name.as_deref(), Some("Ada"));
    assert!(repo.delete(&email).await.unwrap());
}
