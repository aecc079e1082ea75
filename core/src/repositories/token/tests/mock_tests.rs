//! Unit tests for the token repository contract, run against the mock

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::repositories::token::{MockTokenRepository, NoopTokenRepository, TokenRepository};

fn record(user_id: Uuid, hash: &str, ttl: Duration) -> RefreshTokenRecord {
    RefreshTokenRecord::new(user_id, hash.to_string(), Utc::now() + ttl)
}

#[tokio::test]
async fn test_save_and_find_refresh_token() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    let saved = repo
        .save_refresh_token(record(user_id, "test_hash", Duration::days(7)))
        .await
        .unwrap();

    let found = repo.find_refresh_token("test_hash").await.unwrap();
    assert_eq!(found.id, saved.id);
    assert_eq!(found.user_id, user_id);
}

#[tokio::test]
async fn test_duplicate_hash_is_rejected() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    repo.save_refresh_token(record(user_id, "same_hash", Duration::days(7)))
        .await
        .unwrap();
    let result = repo
        .save_refresh_token(record(user_id, "same_hash", Duration::days(7)))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_take_consumes_exactly_once() {
    let repo = MockTokenRepository::new();
    repo.insert(record(Uuid::new_v4(), "hash", Duration::days(1))).await;

    assert!(repo.take_refresh_token("hash").await.unwrap().is_some());
    assert!(repo.take_refresh_token("hash").await.unwrap().is_none());
    assert!(repo.find_refresh_token("hash").await.is_none());
}

#[tokio::test]
async fn test_delete_user_token_checks_owner() {
    let repo = MockTokenRepository::new();
    let owner = Uuid::new_v4();
    repo.insert(record(owner, "hash", Duration::days(1))).await;

    assert!(!repo.delete_user_token(Uuid::new_v4(), "hash").await.unwrap());
    assert!(repo.delete_user_token(owner, "hash").await.unwrap());
    assert_eq!(repo.len().await, 0);
}

#[tokio::test]
async fn test_delete_all_and_count() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    let other = Uuid::new_v4();
    repo.insert(record(user_id, "a", Duration::days(1))).await;
    repo.insert(record(user_id, "b", Duration::days(1))).await;
    repo.insert(record(other, "c", Duration::days(1))).await;

    assert_eq!(repo.count_user_tokens(user_id).await, 2);
    assert_eq!(repo.delete_all_user_tokens(user_id).await.unwrap(), 2);
    assert_eq!(repo.count_user_tokens(other).await, 1);
}

#[tokio::test]
async fn test_delete_expired_tokens() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    repo.insert(record(user_id, "live", Duration::days(1))).await;
    repo.insert(record(user_id, "stale", Duration::seconds(-5))).await;

    assert_eq!(repo.delete_expired_tokens().await.unwrap(), 1);
    assert!(repo.find_refresh_token("live").await.is_some());
}

#[tokio::test]
async fn test_noop_repository_never_finds_anything() {
    let repo = NoopTokenRepository::new();
    let user_id = Uuid::new_v4();

    repo.save_refresh_token(record(user_id, "hash", Duration::days(1)))
        .await
        .unwrap();

    assert!(repo.take_refresh_token("hash").await.unwrap().is_none());
    assert_eq!(repo.delete_all_user_tokens(user_id).await.unwrap(), 0);
    assert_eq!(repo.delete_expired_tokens().await.unwrap(), 0);
}
