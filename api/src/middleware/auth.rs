//! Bearer token authentication.
//!
//! Handlers that need a signed-in user take an [`AuthContext`] parameter. The
//! extractor reads the `Authorization: Bearer` header and verifies the access
//! token with the token service held in [`AppState`].

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use uuid::Uuid;

use hive_core::domain::entities::Identity;
use hive_core::errors::{DomainError, TokenError};

use crate::app::AppState;
use crate::handlers::error::ApiError;

/// The user a request was authenticated as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Identity> for AuthContext {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.id,
            email: identity.email,
        }
    }
}

impl From<AuthContext> for Identity {
    fn from(context: AuthContext) -> Self {
        Identity::new(context.user_id, context.email)
    }
}

impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthContext, ApiError> {
    let token = extract_bearer_token(req).ok_or(DomainError::Token(TokenError::Unauthenticated))?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| DomainError::internal("Application state is not configured"))?;

    let identity = state.auth_service.verify_access_token(token)?;
    Ok(identity.into())
}

/// Extracts the token from `Authorization: Bearer <token>`
pub(crate) fn extract_bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[::core::prelude::v1::test]
    fn test_extract_bearer_token() {
        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), Some("test_token_123"));

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "bearer abc"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), Some("abc"));

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), None);

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), None);

        let req = test::TestRequest::default().to_http_request();
        assert_eq!(extract_bearer_token(&req), None);
    }

    #[::core::prelude::v1::test]
    fn test_missing_state_is_internal() {
        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc"))
            .to_http_request();
        assert!(matches!(
            authenticate(&req),
            Err(ApiError::Domain(DomainError::Internal { .. }))
        ));
    }
}
