use actix_web::{web, HttpResponse};

use hive_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{CompleteRequest, LoginRequest};
use crate::dto::validate_request;
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/auth/login
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&request.0)?;

    let response = state.auth_service.login(&request.email, &request.password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Login successful", response)))
}

/// Handler for POST /api/v1/auth/login/init
///
/// Checks the password, then emails a sign-in code. No tokens are issued yet.
pub async fn login_init(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&request.0)?;

    state
        .auth_service
        .login_init(&request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Verification code sent to email")))
}

/// Handler for POST /api/v1/auth/login/complete
pub async fn login_complete(
    state: web::Data<AppState>,
    request: web::Json<CompleteRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&request.0)?;

    let response = state
        .auth_service
        .login_complete(&request.email, &request.code)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Login successful", response)))
}
