//! CORS configuration for cross-origin requests.
//!
//! Origins come from `CORS_ORIGIN`. A `*` entry allows any origin.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use hive_shared::config::CorsConfig;

/// Creates the CORS middleware for the configured allow-list.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![
            header::RETRY_AFTER,
            header::HeaderName::from_static("ratelimit-limit"),
            header::HeaderName::from_static("ratelimit-remaining"),
            header::HeaderName::from_static("ratelimit-reset"),
        ])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        log::warn!("CORS allows any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        cors = cors.supports_credentials();
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    fn config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            max_age: 600,
        }
    }

    #[actix_web::test]
    async fn test_listed_origin_is_allowed() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config(&["https://app.studyhive.io"])))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://app.studyhive.io"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.studyhive.io"
        );
    }

    #[actix_web::test]
    async fn test_unlisted_origin_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config(&["https://app.studyhive.io"])))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://evil.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
