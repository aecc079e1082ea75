use actix_web::{web, HttpResponse};

use hive_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::ForgotPasswordRequest;
use crate::dto::validate_request;
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/auth/forgot-password
///
/// Answers the same way whether or not the email has an account.
pub async fn forgot_password(
    state: web::Data<AppState>,
    request: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&request.0)?;

    state.auth_service.forgot_password(&request.email).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "If an account exists for this email, a password reset link has been sent",
    )))
}
