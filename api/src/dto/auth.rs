//! Request and response bodies of the `/auth` endpoints
//!
//! Field checks here are limited to size bounds. Email shape, password policy
//! and code format are enforced by the auth service so every entry point
//! reports them the same way. Missing fields default to empty and are then
//! reported as required.

use serde::{Deserialize, Serialize};
use validator::Validate;

use hive_core::domain::entities::identity::UserProfile;
use hive_core::domain::value_objects::UserView;
use hive_core::services::NewRegistration;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 254, message = "email must be at most 254 characters"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 72, message = "password must be at most 72 characters"))]
    pub password: String,

    #[serde(default, alias = "firstName")]
    #[validate(length(max = 100, message = "first_name must be at most 100 characters"))]
    pub first_name: Option<String>,

    #[serde(default, alias = "lastName")]
    #[validate(length(max = 100, message = "last_name must be at most 100 characters"))]
    pub last_name: Option<String>,
}

impl From<RegisterRequest> for NewRegistration {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            profile: UserProfile {
                first_name: request.first_name,
                last_name: request.last_name,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 254, message = "email must be at most 254 characters"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 72, message = "password must be at most 72 characters"))]
    pub password: String,
}

/// Second step of the OTP flows
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CompleteRequest {
    #[serde(default)]
    #[validate(length(max = 254, message = "email must be at most 254 characters"))]
    pub email: String,

    #[serde(default, alias = "token")]
    #[validate(length(max = 16, message = "code must be at most 16 characters"))]
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutRequest {
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[validate(length(max = 254, message = "email must be at most 254 characters"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user: UserView,
}
