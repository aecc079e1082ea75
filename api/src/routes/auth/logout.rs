use actix_web::{web, HttpResponse};

use hive_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::LogoutRequest;
use crate::handlers::error::ApiError;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/auth/logout
///
/// Requires a bearer token. With a `refresh_token` in the body only that
/// session is revoked, otherwise every refresh token of the user is.
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: Option<web::Json<LogoutRequest>>,
) -> Result<HttpResponse, ApiError> {
    let refresh_token = request.and_then(|body| body.into_inner().refresh_token);

    state
        .auth_service
        .logout(auth.user_id, refresh_token.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Logged out successfully")))
}
