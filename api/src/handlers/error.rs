//! HTTP mapping of domain errors
//!
//! Every error leaves the API as the standard envelope: `message` is the
//! status reason and `error` carries the underlying message.

use actix_web::{
    body::BoxBody,
    dev::ServiceResponse,
    error::JsonPayloadError,
    http::{header, StatusCode},
    middleware::ErrorHandlerResponse,
    HttpRequest, HttpResponse, ResponseError,
};
use thiserror::Error;

use hive_core::errors::{AuthError, DomainError, TokenError};
use hive_shared::types::ApiResponse;

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Errors returned by handlers and extractors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request body could not be read
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Domain(DomainError::Validation {
            message: message.into(),
        })
    }
}

/// HTTP status of a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
        DomainError::Auth(AuthError::RegistrationExpired) => StatusCode::BAD_REQUEST,
        DomainError::Auth(AuthError::UserAlreadyExists) => StatusCode::CONFLICT,
        DomainError::Token(TokenError::TokenGenerationFailed) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(_) => StatusCode::UNAUTHORIZED,
        DomainError::Validation { .. } | DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
        DomainError::Upstream { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Envelope for a failed request
pub fn error_envelope(status: StatusCode, error: impl Into<String>) -> HttpResponse {
    let reason = status.canonical_reason().unwrap_or("Error");
    HttpResponse::build(status).json(ApiResponse::error(reason, Some(error.into())))
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(error) => status_for(error),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }
        error_envelope(status, self.to_string())
    }
}

/// Turn body deserialization failures into a 400 envelope
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON body: {}", e),
        other => other.to_string(),
    };
    ApiError::BadRequest(message).into()
}

/// Default service for unknown routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error(
        format!("Not Found - {}", req.path()),
        Some(format!("Cannot {} {}", req.method(), req.path())),
    ))
}

/// Replace the body of a 500 with the generic envelope
pub fn redact_internal_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, res) = res.into_parts();
    let body = serde_json::to_string(&ApiResponse::error(
        INTERNAL_SERVER_ERROR,
        Some(INTERNAL_SERVER_ERROR.to_string()),
    ))?;

    let mut res = res.set_body(body);
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    let res = ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();

    Ok(ErrorHandlerResponse::Response(res))
}
