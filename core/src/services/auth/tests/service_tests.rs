//! Unit tests for the authentication flows

use std::sync::Arc;

use chrono::Duration;

use crate::domain::entities::identity::UserProfile;
use crate::errors::{AuthError, DomainError, TokenError, ValidationError};
use crate::repositories::{
    MockPendingRegistrationRepository, MockTokenRepository, PendingRegistrationRepository,
    TokenRepository,
};
use crate::services::auth::{AuthService, AuthServiceConfig, NewRegistration};
use crate::services::encryption::PasswordSealer;
use crate::services::token::{TokenService, TokenServiceConfig};

use super::mocks::{MockIdentityProvider, MOCK_CODE};

type TestAuthService =
    AuthService<MockIdentityProvider, MockTokenRepository, MockPendingRegistrationRepository>;

struct Fixture {
    service: TestAuthService,
    provider: Arc<MockIdentityProvider>,
    tokens: Arc<MockTokenRepository>,
    pending: Arc<MockPendingRegistrationRepository>,
}

fn fixture_with(provider: MockIdentityProvider, config: AuthServiceConfig) -> Fixture {
    let provider = Arc::new(provider);
    let tokens = Arc::new(MockTokenRepository::new());
    let pending = Arc::new(MockPendingRegistrationRepository::new());
    let token_service = Arc::new(TokenService::new(tokens.clone(), TokenServiceConfig::default()));
    let sealer = Arc::new(PasswordSealer::new(&[3u8; 32]).unwrap());

    Fixture {
        service: AuthService::new(provider.clone(), token_service, pending.clone(), sealer, config),
        provider,
        tokens,
        pending,
    }
}

fn fixture() -> Fixture {
    fixture_with(MockIdentityProvider::new(), AuthServiceConfig::default())
}

fn registration(email: &str) -> NewRegistration {
    NewRegistration {
        email: email.to_string(),
        password: "pw123456".to_string(),
        profile: UserProfile {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
        },
    }
}

#[tokio::test]
async fn test_register_issues_tokens() {
    let f = fixture();

    let response = f.service.register(registration("Ada@Uni.edu ")).await.unwrap();

    assert_eq!(response.user.email, "ada@uni.edu");
    assert_eq!(response.tokens.token_type, "Bearer");
    let identity = f.service.verify_access_token(&response.tokens.access_token).unwrap();
    assert_eq!(identity.id, response.user.id);
    assert_eq!(f.tokens.len().await, 1);
}

#[tokio::test]
async fn test_register_requires_names() {
    let f = fixture();
    let mut input = registration("a@x.com");
    input.profile.last_name = None;

    let result = f.service.register(input).await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { ref field })) if field == "last_name"
    ));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let f = fixture_with(MockIdentityProvider::with_account("a@x.com", "pw123456"), AuthServiceConfig::default());

    let result = f.service.register(registration("a@x.com")).await;
    assert_eq!(result.unwrap_err(), DomainError::Auth(AuthError::UserAlreadyExists));
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let f = fixture();

    let mut input = registration("not-an-email");
    assert_eq!(
        f.service.register(input.clone()).await.unwrap_err(),
        DomainError::ValidationErr(ValidationError::InvalidEmail)
    );

    input.email = "a@x.com".to_string();
    input.password = "short".to_string();
    assert!(matches!(
        f.service.register(input).await,
        Err(DomainError::ValidationErr(ValidationError::InvalidLength { min: 8, .. }))
    ));
}

#[tokio::test]
async fn test_register_init_then_complete() {
    let f = fixture();

    f.service
        .register_init(NewRegistration {
            profile: UserProfile::default(),
            ..registration("a@x.com")
        })
        .await
        .unwrap();

    let pending = f.pending.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(pending.sealed_password.ciphertext, "pw123456");
    assert_eq!(f.provider.otp_requests.lock().unwrap()[0], ("a@x.com".to_string(), true));

    let response = f.service.register_complete("a@x.com", MOCK_CODE).await.unwrap();
    assert_eq!(response.user.email, "a@x.com");

    // The sealed password was applied upstream and the pending record consumed
    let account = f.provider.account("a@x.com").unwrap();
    assert_eq!(account.password.as_deref(), Some("pw123456"));
    assert_eq!(f.pending.len().await, 0);
}

#[tokio::test]
async fn test_register_complete_without_init() {
    let f = fixture();

    let result = f.service.register_complete("a@x.com", MOCK_CODE).await;
    assert_eq!(result.unwrap_err(), DomainError::Auth(AuthError::RegistrationExpired));
}

#[tokio::test]
async fn test_register_complete_after_expiry() {
    let f = fixture_with(
        MockIdentityProvider::new(),
        AuthServiceConfig {
            pending_registration_ttl: Duration::seconds(-1),
        },
    );
    f.service.register_init(registration("a@x.com")).await.unwrap();

    let result = f.service.register_complete("a@x.com", MOCK_CODE).await;
    assert_eq!(result.unwrap_err(), DomainError::Auth(AuthError::RegistrationExpired));
    assert_eq!(f.pending.len().await, 0);
}

#[tokio::test]
async fn test_wrong_code_then_right_code() {
    let f = fixture();
    f.service.register_init(registration("a@x.com")).await.unwrap();

    let wrong = f.service.register_complete("a@x.com", "000000").await;
    assert_eq!(wrong.unwrap_err(), DomainError::Auth(AuthError::InvalidCredentials));
    assert_eq!(f.pending.len().await, 1);

    let account = f.provider.account("a@x.com").unwrap();
    assert!(account.password.is_none());

    let right = f.service.register_complete("a@x.com", MOCK_CODE).await.unwrap();
    assert_eq!(right.user.id, account.identity.id);
    assert_eq!(f.pending.len().await, 0);

    let profile = f.provider.account("a@x.com").unwrap().profile;
    assert_eq!(profile.first_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_register_init_replaces_previous_attempt() {
    let f = fixture();
    f.service.register_init(registration("a@x.com")).await.unwrap();

    let mut second = registration("a@x.com");
    second.password = "another-password".to_string();
    f.service.register_init(second).await.unwrap();
    assert_eq!(f.pending.len().await, 1);

    f.service.register_complete("a@x.com", MOCK_CODE).await.unwrap();
    let account = f.provider.account("a@x.com").unwrap();
    assert_eq!(account.password.as_deref(), Some("another-password"));
}

#[tokio::test]
async fn test_malformed_code_is_a_validation_error() {
    let f = fixture();
    f.service.register_init(registration("a@x.com")).await.unwrap();

    let result = f.service.register_complete("a@x.com", "12ab").await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::InvalidFormat { .. }))
    ));
}

#[tokio::test]
async fn test_code_with_surrounding_whitespace_is_accepted() {
    let f = fixture();
    f.service.register_init(registration("a@x.com")).await.unwrap();

    let padded = format!(" {}\n", MOCK_CODE);
    let response = f.service.register_complete("a@x.com", &padded).await.unwrap();
    assert_eq!(response.user.email, "a@x.com");

    f.service.login_init("a@x.com", "pw123456").await.unwrap();
    let response = f.service.login_complete("a@x.com", &format!("{} ", MOCK_CODE)).await.unwrap();
    assert_eq!(response.user.email, "a@x.com");
}

#[tokio::test]
async fn test_login_with_password() {
    let f = fixture_with(MockIdentityProvider::with_account("a@x.com", "pw123456"), AuthServiceConfig::default());

    let response = f.service.login("A@x.com", "pw123456").await.unwrap();
    assert_eq!(response.user.email, "a@x.com");

    let wrong = f.service.login("a@x.com", "nope-nope").await;
    assert_eq!(wrong.unwrap_err(), DomainError::Auth(AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_init_then_complete() {
    let f = fixture_with(MockIdentityProvider::with_account("a@x.com", "pw123456"), AuthServiceConfig::default());

    f.service.login_init("a@x.com", "pw123456").await.unwrap();
    assert_eq!(f.provider.otp_requests.lock().unwrap()[0], ("a@x.com".to_string(), false));

    let response = f.service.login_complete("a@x.com", MOCK_CODE).await.unwrap();
    assert_eq!(response.user.email, "a@x.com");
}

#[tokio::test]
async fn test_login_init_wrong_password_sends_nothing() {
    let f = fixture_with(MockIdentityProvider::with_account("a@x.com", "pw123456"), AuthServiceConfig::default());

    let result = f.service.login_init("a@x.com", "wrong-password").await;
    assert_eq!(result.unwrap_err(), DomainError::Auth(AuthError::InvalidCredentials));
    assert!(f.provider.otp_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_and_logout() {
    let f = fixture();
    let response = f.service.register(registration("a@x.com")).await.unwrap();
    let user_id = response.user.id;

    let rotated = f.service.refresh_token(&response.tokens.refresh_token).await.unwrap();
    assert!(f.service.refresh_token(&response.tokens.refresh_token).await.is_err());

    // Another session for the same user
    f.service.login("a@x.com", "pw123456").await.unwrap();
    assert_eq!(f.tokens.count_user_tokens(user_id).await, 2);

    assert_eq!(f.service.logout(user_id, Some(&rotated.refresh_token)).await.unwrap(), 1);
    assert_eq!(
        f.service.refresh_token(&rotated.refresh_token).await.unwrap_err(),
        DomainError::Token(TokenError::InvalidRefreshToken)
    );

    assert_eq!(f.service.logout(user_id, None).await.unwrap(), 1);
    assert_eq!(f.tokens.len().await, 0);
}

#[tokio::test]
async fn test_forgot_password_delegates() {
    let f = fixture();

    f.service.forgot_password(" Someone@X.com").await.unwrap();
    assert_eq!(*f.provider.reset_requests.lock().unwrap(), vec!["someone@x.com".to_string()]);
}

#[tokio::test]
async fn test_forgot_password_hides_unknown_accounts() {
    let f = fixture();
    f.provider.fail_with(DomainError::NotFound {
        resource: "user".to_string(),
    });
    assert!(f.service.forgot_password("ghost@x.com").await.is_ok());

    f.provider.fail_with(DomainError::upstream("service unavailable"));
    assert!(matches!(
        f.service.forgot_password("ghost@x.com").await,
        Err(DomainError::Upstream { .. })
    ));

    assert!(matches!(
        f.service.forgot_password("not-an-email").await,
        Err(DomainError::ValidationErr(ValidationError::InvalidEmail))
    ));
}

#[tokio::test]
async fn test_upstream_failures_propagate() {
    let f = fixture();
    f.provider.fail_with(DomainError::upstream("service unavailable"));

    let result = f.service.register_init(registration("a@x.com")).await;
    assert!(matches!(result, Err(DomainError::Upstream { .. })));
}
