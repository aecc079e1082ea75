//! Rate limiting middleware for API endpoints
//!
//! Fixed-window counting per client IP. Counters are kept in a
//! [`RateLimitStore`] under `rate_limit:{scope}:{ip}`, so a Redis store shares
//! them between instances. When the store fails the request is let through.

use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER},
    Error,
};
use futures_util::future::LocalBoxFuture;

use hive_core::services::rate_limit::{RateLimitStore, WindowHit};
use hive_shared::config::{RateLimitConfig, WindowLimit};

use crate::handlers::error::error_envelope;

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    scope: &'static str,
    limit: WindowLimit,
    enabled: bool,
    message: &'static str,
}

impl RateLimiter {
    /// Limit applied to every request
    pub fn api(store: Arc<dyn RateLimitStore>, config: &RateLimitConfig) -> Self {
        Self {
            store,
            scope: "api",
            limit: config.api,
            enabled: config.enabled,
            message: "Too many requests, please try again later",
        }
    }

    /// Stricter limit for the `/auth` endpoints
    pub fn auth(store: Arc<dyn RateLimitStore>, config: &RateLimitConfig) -> Self {
        Self {
            store,
            scope: "auth",
            limit: config.auth,
            enabled: config.enabled,
            message: "Too many authentication attempts, please try again later",
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            limiter: self.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();

        Box::pin(async move {
            if !limiter.enabled {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let ip = client_ip(&req);
            let key = format!("rate_limit:{}:{}", limiter.scope, ip);

            let hit = match limiter.store.hit(&key, limiter.limit.window_seconds()).await {
                Ok(hit) => hit,
                Err(e) => {
                    log::warn!("Rate limit store unavailable, allowing request: {}", e);
                    return service.call(req).await.map(ServiceResponse::map_into_left_body);
                }
            };

            if hit.exceeds(limiter.limit.max) {
                log::warn!(
                    "Rate limit exceeded for {} on {} {}",
                    ip,
                    req.method(),
                    req.path()
                );

                let mut response = error_envelope(
                    actix_web::http::StatusCode::TOO_MANY_REQUESTS,
                    limiter.message,
                );
                rate_limit_headers(response.headers_mut(), &limiter.limit, &hit);
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from(hit.reset_after_seconds));

                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut response = service.call(req).await?;
            rate_limit_headers(response.headers_mut(), &limiter.limit, &hit);
            Ok(response.map_into_left_body())
        })
    }
}

/// Socket address of the caller
///
/// Forwarding headers are not trusted, since any client can set them.
fn client_ip(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// `RateLimit-*` headers from the IETF draft
///
/// A nested limiter has already reported its own, stricter window.
fn rate_limit_headers(headers: &mut HeaderMap, limit: &WindowLimit, hit: &WindowHit) {
    if headers.contains_key("ratelimit-limit") {
        return;
    }

    let remaining = u64::from(limit.max).saturating_sub(hit.count);
    headers.insert(
        HeaderName::from_static("ratelimit-limit"),
        HeaderValue::from(limit.max),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-remaining"),
        HeaderValue::from(remaining),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-reset"),
        HeaderValue::from(hit.reset_after_seconds),
    );
}
