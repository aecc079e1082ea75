//! Main authentication service implementation

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use hive_shared::utils::validation::{
    is_valid_email, is_valid_otp_code, is_valid_password, mask_email, normalize_email,
    MIN_PASSWORD_LENGTH,
};

use crate::domain::entities::identity::{UserProfile, UserUpdate};
use crate::domain::entities::pending_registration::PendingRegistration;
use crate::domain::entities::token::TokenPair;
use crate::domain::entities::Identity;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{PendingRegistrationRepository, TokenRepository};
use crate::services::encryption::PasswordSealer;
use crate::services::identity::IdentityProvider;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Input of the registration flows
#[derive(Debug, Clone, Default)]
pub struct NewRegistration {
    pub email: String,
    pub password: String,
    pub profile: UserProfile,
}

/// Authentication service for managing the complete authentication flow
pub struct AuthService<I, T, P>
where
    I: IdentityProvider + ?Sized,
    T: TokenRepository + ?Sized,
    P: PendingRegistrationRepository + ?Sized,
{
    /// Hosted backend owning the credentials
    identity_provider: Arc<I>,
    /// Token service for JWT management
    token_service: Arc<TokenService<T>>,
    /// Registrations awaiting their emailed code
    pending_registrations: Arc<P>,
    sealer: Arc<PasswordSealer>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<I, T, P> AuthService<I, T, P>
where
    I: IdentityProvider + ?Sized,
    T: TokenRepository + ?Sized,
    P: PendingRegistrationRepository + ?Sized,
{
    /// Create a new authentication service
    pub fn new(
        identity_provider: Arc<I>,
        token_service: Arc<TokenService<T>>,
        pending_registrations: Arc<P>,
        sealer: Arc<PasswordSealer>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            identity_provider,
            token_service,
            pending_registrations,
            sealer,
            config,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService<T>> {
        &self.token_service
    }

    /// Register with a password and sign in immediately
    ///
    /// Both names are required on this path.
    pub async fn register(&self, registration: NewRegistration) -> DomainResult<AuthResponse> {
        // Step 1: Validate input
        let email = Self::validate_email(&registration.email)?;
        Self::validate_password(&registration.password)?;
        Self::require_name("first_name", registration.profile.first_name.as_deref())?;
        Self::require_name("last_name", registration.profile.last_name.as_deref())?;

        // Step 2: Create the account upstream
        let identity = self
            .identity_provider
            .sign_up(&email, &registration.password, &registration.profile)
            .await?;

        info!(user_id = %identity.id, email = %mask_email(&email), "User registered");

        // Step 3: Issue tokens
        self.authenticate(identity).await
    }

    /// Start a registration confirmed by an emailed code
    ///
    /// A second call for the same email replaces the earlier pending registration.
    pub async fn register_init(&self, registration: NewRegistration) -> DomainResult<()> {
        // Step 1: Validate input
        let email = Self::validate_email(&registration.email)?;
        Self::validate_password(&registration.password)?;

        // Step 2: Seal the password and store the pending registration
        let sealed_password = self.sealer.seal(&registration.password)?;
        let pending = PendingRegistration::new(
            email.clone(),
            sealed_password,
            registration.profile,
            self.config.pending_registration_ttl,
        );
        self.pending_registrations.upsert(pending).await?;

        // Step 3: Ask the provider to email a code, creating the account if needed
        self.identity_provider.send_otp(&email, true).await?;

        info!(email = %mask_email(&email), "Registration code sent");
        Ok(())
    }

    /// Finish a registration started with [`AuthService::register_init`]
    ///
    /// A wrong code leaves the pending registration in place so the user can retry.
    pub async fn register_complete(&self, email: &str, code: &str) -> DomainResult<AuthResponse> {
        let email = Self::validate_email(email)?;

        // Step 1: Find a live pending registration
        let pending = match self.pending_registrations.find_by_email(&email).await? {
            Some(pending) if pending.is_expired() => {
                self.pending_registrations.delete(&email).await?;
                debug!(email = %mask_email(&email), "Pending registration expired");
                return Err(AuthError::RegistrationExpired.into());
            }
            Some(pending) => pending,
            None => return Err(AuthError::RegistrationExpired.into()),
        };

        // Step 2: Verify the code with the provider
        let code = Self::validate_code(code)?;
        let identity = self.identity_provider.verify_otp(&email, code).await?;

        // Step 3: Set the chosen password and profile on the account
        let update = UserUpdate {
            password: Some(self.sealer.unseal(&pending.sealed_password)?),
            profile: pending.profile,
        };
        self.identity_provider.update_user(identity.id, &update).await?;

        // Step 4: The pending registration is single use
        self.pending_registrations.delete(&email).await?;

        info!(user_id = %identity.id, email = %mask_email(&email), "User registered with code");

        // Step 5: Issue tokens
        self.authenticate(identity).await
    }

    /// Sign in with email and password
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let email = Self::validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            }
            .into());
        }

        let identity = self
            .identity_provider
            .sign_in_with_password(&email, password)
            .await
            .map_err(|e| {
                warn!(email = %mask_email(&email), "Password sign-in failed");
                e
            })?;

        info!(user_id = %identity.id, "User logged in");
        self.authenticate(identity).await
    }

    /// Check the password, then email a sign-in code
    pub async fn login_init(&self, email: &str, password: &str) -> DomainResult<()> {
        let email = Self::validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            }
            .into());
        }

        // Step 1: Verify the password
        self.identity_provider
            .sign_in_with_password(&email, password)
            .await?;

        // Step 2: Send the code; never create an account on this path
        self.identity_provider.send_otp(&email, false).await?;

        info!(email = %mask_email(&email), "Login code sent");
        Ok(())
    }

    /// Finish a sign-in started with [`AuthService::login_init`]
    pub async fn login_complete(&self, email: &str, code: &str) -> DomainResult<AuthResponse> {
        let email = Self::validate_email(email)?;
        let code = Self::validate_code(code)?;

        let identity = self.identity_provider.verify_otp(&email, code).await?;

        info!(user_id = %identity.id, "User logged in with code");
        self.authenticate(identity).await
    }

    /// Rotate a refresh token into a new pair
    pub async fn refresh_token(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        if refresh_token.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "refresh_token".to_string(),
            }
            .into());
        }

        self.token_service.refresh(refresh_token).await
    }

    /// Revoke the given refresh token, or every token of the user when none is given
    ///
    /// # Returns
    ///
    /// The number of refresh records removed
    pub async fn logout(&self, user_id: Uuid, refresh_token: Option<&str>) -> DomainResult<usize> {
        let removed = match refresh_token.filter(|t| !t.trim().is_empty()) {
            Some(token) => usize::from(self.token_service.revoke_refresh_token(user_id, token).await?),
            None => self.token_service.revoke_all(user_id).await?,
        };

        info!(user_id = %user_id, removed, "User logged out");
        Ok(removed)
    }

    /// Ask the provider to email a password reset link
    ///
    /// Unknown accounts are not reported, so the outcome does not reveal whether
    /// the email is registered. Upstream outages still surface.
    pub async fn forgot_password(&self, email: &str) -> DomainResult<()> {
        let email = Self::validate_email(email)?;

        match self.identity_provider.send_password_reset(&email).await {
            Ok(()) => {}
            Err(DomainError::Auth(_)) | Err(DomainError::NotFound { .. }) => {
                debug!(email = %mask_email(&email), "Password reset for unknown account");
            }
            Err(e) => return Err(e),
        }

        info!(email = %mask_email(&email), "Password reset requested");
        Ok(())
    }

    pub fn verify_access_token(&self, token: &str) -> DomainResult<Identity> {
        self.token_service.verify_access_token(token)
    }

    async fn authenticate(&self, identity: Identity) -> DomainResult<AuthResponse> {
        let tokens = self.token_service.issue(&identity).await?;
        Ok(AuthResponse::new(identity, tokens))
    }

    fn validate_email(email: &str) -> DomainResult<String> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "email".to_string(),
            }
            .into());
        }
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        Ok(email)
    }

    fn validate_password(password: &str) -> DomainResult<()> {
        if !is_valid_password(password) {
            return Err(ValidationError::InvalidLength {
                field: "password".to_string(),
                min: MIN_PASSWORD_LENGTH,
            }
            .into());
        }
        Ok(())
    }

    /// Returns the code without surrounding whitespace
    fn validate_code(code: &str) -> DomainResult<&str> {
        let code = code.trim();
        if !is_valid_otp_code(code) {
            return Err(ValidationError::InvalidFormat {
                field: "code".to_string(),
            }
            .into());
        }
        Ok(code)
    }

    fn require_name(field: &str, value: Option<&str>) -> DomainResult<()> {
        match value {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(ValidationError::RequiredField {
                field: field.to_string(),
            }
            .into()),
        }
    }
}
