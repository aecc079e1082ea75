use actix_web::{web, HttpResponse};

use hive_shared::types::HealthResponse;

use crate::app::AppState;

const SERVICE_NAME: &str = "studyhive-api";

/// Handler for GET /health
///
/// Always answers 200. `database` is omitted when running without Postgres and
/// `status` turns to `degraded` when the database does not answer.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match &state.database {
        Some(pool) => Some(pool.health_check().await.unwrap_or_else(|e| {
            log::error!("Database health check failed: {}", e);
            false
        })),
        None => None,
    };

    HttpResponse::Ok().json(HealthResponse::new(
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        database,
    ))
}
