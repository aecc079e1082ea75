use actix_web::{web, HttpResponse};

use hive_shared::types::ApiResponse;
use hive_shared::utils::validation::mask_email;

use crate::app::AppState;
use crate::dto::auth::{CompleteRequest, RegisterRequest};
use crate::dto::validate_request;
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/auth/register
///
/// Creates the account and signs in. Both names are required.
///
/// ## Success (201 Created)
/// ```json
/// {
///     "success": true,
///     "message": "User created successfully",
///     "data": { "user": { "id": "...", "email": "..." }, "tokens": { ... } }
/// }
/// ```
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&request.0)?;

    let response = state.auth_service.register(request.into_inner().into()).await?;

    log::info!("Registered {}", mask_email(&response.user.email));
    Ok(HttpResponse::Created().json(ApiResponse::success("User created successfully", response)))
}

/// Handler for POST /api/v1/auth/register/init
///
/// Holds the registration and emails a verification code.
pub async fn register_init(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&request.0)?;

    state.auth_service.register_init(request.into_inner().into()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Verification code sent to email")))
}

/// Handler for POST /api/v1/auth/register/complete
///
/// Redeems the emailed code, creates the account and signs in.
pub async fn register_complete(
    state: web::Data<AppState>,
    request: web::Json<CompleteRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&request.0)?;

    let response = state
        .auth_service
        .register_complete(&request.email, &request.code)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success("Registration successful", response)))
}
