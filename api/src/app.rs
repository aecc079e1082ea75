//! Application state and factory
//!
//! This module holds the shared services handed to every handler and builds the
//! Actix-web application with its middleware stack.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    middleware::{ErrorHandlers, Logger},
    web, App, Error,
};

use hive_core::repositories::{PendingRegistrationRepository, TokenRepository};
use hive_core::services::{AuthService, IdentityProvider, RateLimitStore};
use hive_infra::database::DatabasePool;
use hive_shared::config::AppConfig;

use crate::handlers::error::{json_error_handler, not_found, redact_internal_error};
use crate::middleware::{cors::create_cors, rate_limit::RateLimiter, security::SecurityHeaders};
use crate::routes;

/// Auth service over the backends chosen at startup
pub type DynAuthService =
    AuthService<dyn IdentityProvider, dyn TokenRepository, dyn PendingRegistrationRepository>;

/// Shared services, built once and cloned into every worker
pub struct AppState {
    pub auth_service: Arc<DynAuthService>,
    pub rate_limiter: Arc<dyn RateLimitStore>,
    /// `None` when running on in-memory repositories
    pub database: Option<Arc<DatabasePool>>,
    pub config: AppConfig,
}

/// Create and configure the application
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let config = &state.config;

    let cors = create_cors(&config.cors);
    let security = SecurityHeaders::new(config.environment);
    let api_limiter = RateLimiter::api(state.rate_limiter.clone(), &config.rate_limit);
    let auth_limiter = RateLimiter::auth(state.rate_limiter.clone(), &config.rate_limit);

    let mut error_handlers = ErrorHandlers::new();
    if !config.environment.exposes_error_details() {
        error_handlers =
            error_handlers.handler(StatusCode::INTERNAL_SERVER_ERROR, redact_internal_error);
    }

    App::new()
        .app_data(state.clone())
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // Registered last runs first: Logger, CORS, security headers, then limits
        .wrap(api_limiter)
        .wrap(error_handlers)
        .wrap(security)
        .wrap(cors)
        .wrap(Logger::default())
        .route("/health", web::get().to(routes::health::health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .wrap(auth_limiter)
                    .configure(routes::auth::configure),
            ),
        )
        .default_service(web::route().to(not_found))
}
