//! Supabase GoTrue identity provider
//!
//! Talks to the `/auth/v1` REST API of a Supabase project. The anon key is sent
//! with every request; the service role key is only used for the admin endpoint
//! that sets the password of a user created through the OTP flow.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use hive_core::domain::entities::identity::{Identity, UserProfile, UserUpdate};
use hive_core::errors::{AuthError, DomainError, DomainResult};
use hive_core::services::identity::IdentityProvider;
use hive_shared::config::IdentityProviderConfig;

use crate::InfrastructureError;

/// The GoTrue operation a response belongs to; decides how errors are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GoTrueCall {
    SignUp,
    PasswordGrant,
    SendOtp,
    VerifyOtp,
    UpdateUser,
    Recover,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Uuid,
    email: Option<String>,
}

/// Supabase GoTrue client
#[derive(Clone)]
pub struct SupabaseIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
    service_role_key: Option<String>,
}

impl SupabaseIdentityProvider {
    /// Build a provider from configuration
    ///
    /// Fails when the project URL or anon key is missing.
    pub fn new(config: &IdentityProviderConfig) -> Result<Self, InfrastructureError> {
        let base_url = config
            .url
            .clone()
            .ok_or_else(|| InfrastructureError::Config("SUPABASE_URL is not set".to_string()))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| InfrastructureError::Config("SUPABASE_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        info!("Supabase identity provider configured for {}", base_url);

        Ok(Self {
            client,
            base_url,
            api_key,
            service_role_key: config.service_role_key.clone(),
        })
    }

    fn request(&self, method: Method, path: &str, key: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/auth/v1/{}", self.base_url, path))
            .header("apikey", key)
            .bearer_auth(key)
    }

    /// Send a request and return the JSON body, or a classified error
    async fn send(&self, call: GoTrueCall, request: RequestBuilder) -> DomainResult<Value> {
        let response = request.send().await.map_err(|e| {
            error!(?call, "Identity provider request failed: {}", e);
            DomainError::upstream(format!("Identity provider unreachable: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            DomainError::upstream(format!("Failed to read identity provider response: {}", e))
        })?;

        if !status.is_success() {
            debug!(?call, status = status.as_u16(), "Identity provider rejected request");
            return Err(classify_error(call, status, &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body)
            .map_err(|e| DomainError::upstream(format!("Malformed identity provider response: {}", e)))
    }
}

/// Pull the user out of either a bare user object or a session carrying one
fn extract_identity(value: Value, fallback_email: &str) -> DomainResult<Identity> {
    let user_value = match value.get("user") {
        Some(user) if user.is_object() => user.clone(),
        _ => value,
    };

    let user: GoTrueUser = serde_json::from_value(user_value)
        .map_err(|e| DomainError::upstream(format!("Identity provider returned no user: {}", e)))?;

    Ok(Identity::new(
        user.id,
        user.email.unwrap_or_else(|| fallback_email.to_string()),
    ))
}

fn user_metadata(profile: &UserProfile) -> Value {
    let mut data = serde_json::Map::new();
    if let Some(first_name) = &profile.first_name {
        data.insert("first_name".to_string(), json!(first_name));
    }
    if let Some(last_name) = &profile.last_name {
        data.insert("last_name".to_string(), json!(last_name));
    }
    Value::Object(data)
}

/// Map a GoTrue error response onto the domain taxonomy
pub(crate) fn classify_error(call: GoTrueCall, status: StatusCode, body: &str) -> DomainError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let text = |key: &str| parsed.get(key).and_then(Value::as_str).map(str::to_string);

    let message = text("msg")
        .or_else(|| text("message"))
        .or_else(|| text("error_description"))
        .or_else(|| text("error"))
        .unwrap_or_else(|| {
            let raw = body.trim();
            if raw.is_empty() {
                format!("Identity provider returned {}", status)
            } else {
                raw.to_string()
            }
        });
    let error_code = text("error_code").or_else(|| text("code")).unwrap_or_default();
    let lowered = message.to_lowercase();

    if matches!(error_code.as_str(), "user_already_exists" | "email_exists")
        || lowered.contains("already registered")
        || lowered.contains("already been registered")
    {
        return AuthError::UserAlreadyExists.into();
    }

    let credential_check = matches!(call, GoTrueCall::PasswordGrant | GoTrueCall::VerifyOtp);
    if credential_check
        && matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
        )
    {
        return AuthError::InvalidCredentials.into();
    }

    DomainError::upstream(message)
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &UserProfile,
    ) -> DomainResult<Identity> {
        let body = json!({
            "email": email,
            "password": password,
            "data": user_metadata(profile),
        });

        let value = self
            .send(
                GoTrueCall::SignUp,
                self.request(Method::POST, "signup", &self.api_key).json(&body),
            )
            .await?;

        extract_identity(value, email)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> DomainResult<Identity> {
        let body = json!({ "email": email, "password": password });

        let value = self
            .send(
                GoTrueCall::PasswordGrant,
                self.request(Method::POST, "token?grant_type=password", &self.api_key)
                    .json(&body),
            )
            .await?;

        extract_identity(value, email)
    }

    async fn send_otp(&self, email: &str, create_user: bool) -> DomainResult<()> {
        let body = json!({ "email": email, "create_user": create_user });

        self.send(
            GoTrueCall::SendOtp,
            self.request(Method::POST, "otp", &self.api_key).json(&body),
        )
        .await?;

        Ok(())
    }

    async fn verify_otp(&self, email: &str, code: &str) -> DomainResult<Identity> {
        let body = json!({ "type": "email", "email": email, "token": code });

        let value = self
            .send(
                GoTrueCall::VerifyOtp,
                self.request(Method::POST, "verify", &self.api_key).json(&body),
            )
            .await?;

        extract_identity(value, email)
    }

    async fn update_user(&self, user_id: Uuid, update: &UserUpdate) -> DomainResult<()> {
        if update.is_empty() {
            return Ok(());
        }

        let service_key = self.service_role_key.as_deref().ok_or_else(|| {
            DomainError::internal("SUPABASE_SERVICE_ROLE_KEY is required to update users")
        })?;

        let mut body = serde_json::Map::new();
        if let Some(password) = &update.password {
            body.insert("password".to_string(), json!(password));
        }
        if !update.profile.is_empty() {
            body.insert("user_metadata".to_string(), user_metadata(&update.profile));
        }

        self.send(
            GoTrueCall::UpdateUser,
            self.request(Method::PUT, &format!("admin/users/{}", user_id), service_key)
                .json(&Value::Object(body)),
        )
        .await?;

        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> DomainResult<()> {
        self.send(
            GoTrueCall::Recover,
            self.request(Method::POST, "recover", &self.api_key)
                .json(&json!({ "email": email })),
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_password_is_invalid_credentials() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            classify_error(GoTrueCall::PasswordGrant, StatusCode::BAD_REQUEST, body),
            DomainError::Auth(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_expired_code_is_invalid_credentials() {
        let body = r#"{"code":403,"error_code":"otp_expired","msg":"Token has expired or is invalid"}"#;
        assert_eq!(
            classify_error(GoTrueCall::VerifyOtp, StatusCode::FORBIDDEN, body),
            DomainError::Auth(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_duplicate_signup() {
        let body = r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#;
        assert_eq!(
            classify_error(GoTrueCall::SignUp, StatusCode::UNPROCESSABLE_ENTITY, body),
            DomainError::Auth(AuthError::UserAlreadyExists)
        );

        let legacy = r#"{"msg":"A user with this email address has already been registered"}"#;
        assert_eq!(
            classify_error(GoTrueCall::SignUp, StatusCode::BAD_REQUEST, legacy),
            DomainError::Auth(AuthError::UserAlreadyExists)
        );
    }

    #[test]
    fn test_other_failures_are_upstream() {
        let body = r#"{"code":429,"error_code":"over_email_send_rate_limit","msg":"Email rate limit exceeded"}"#;
        assert_eq!(
            classify_error(GoTrueCall::SendOtp, StatusCode::TOO_MANY_REQUESTS, body),
            DomainError::upstream("Email rate limit exceeded")
        );

        // A 400 outside a credential check is not a credential failure
        assert!(matches!(
            classify_error(GoTrueCall::SignUp, StatusCode::BAD_REQUEST, r#"{"msg":"Password should be at least 6 characters"}"#),
            DomainError::Upstream { .. }
        ));
    }

    #[test]
    fn test_non_json_error_body() {
        assert_eq!(
            classify_error(GoTrueCall::Recover, StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            DomainError::upstream("<html>bad gateway</html>")
        );
        assert!(matches!(
            classify_error(GoTrueCall::Recover, StatusCode::SERVICE_UNAVAILABLE, ""),
            DomainError::Upstream { ref message } if message.contains("503")
        ));
    }

    #[test]
    fn test_extract_identity_from_session_or_user() {
        let id = Uuid::new_v4();
        let session = json!({"access_token": "x", "user": {"id": id, "email": "a@x.com"}});
        assert_eq!(extract_identity(session, "fallback@x.com").unwrap(), Identity::new(id, "a@x.com"));

        let bare = json!({"id": id});
        assert_eq!(extract_identity(bare, "fallback@x.com").unwrap().email, "fallback@x.com");

        assert!(extract_identity(json!({}), "a@x.com").is_err());
    }

    #[test]
    fn test_provider_requires_url_and_key() {
        assert!(SupabaseIdentityProvider::new(&IdentityProviderConfig::default()).is_err());

        let config = IdentityProviderConfig {
            url: Some("https://abc.supabase.co".to_string()),
            api_key: Some("anon".to_string()),
            ..Default::default()
        };
        assert!(SupabaseIdentityProvider::new(&config).is_ok());
    }
}
