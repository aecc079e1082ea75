use actix_web::HttpResponse;

use hive_core::domain::entities::Identity;
use hive_shared::types::ApiResponse;

use crate::dto::auth::MeResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/me
pub async fn me(auth: AuthContext) -> HttpResponse {
    let identity: Identity = auth.into();
    HttpResponse::Ok().json(ApiResponse::success(
        "User retrieved successfully",
        MeResponse {
            user: identity.into(),
        },
    ))
}
