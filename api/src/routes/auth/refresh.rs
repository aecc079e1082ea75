use actix_web::{web, HttpResponse};

use hive_core::domain::value_objects::RefreshResponse;
use hive_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::RefreshTokenRequest;
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/auth/refresh-token
///
/// Exchanges a refresh token for a new pair. With persisted revocation the
/// presented token is consumed and a second use answers 401.
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "Token refreshed successfully",
///     "data": { "tokens": { "access_token": "...", "refresh_token": "...", ... } }
/// }
/// ```
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    let tokens = state.auth_service.refresh_token(&request.refresh_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Token refreshed successfully",
        RefreshResponse { tokens },
    )))
}
