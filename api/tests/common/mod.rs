//! Shared setup for the API integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, http::header, test, web};
use serde_json::{json, Value};

use hive_api::bootstrap::{assemble_state, Backends};
use hive_api::AppState;
use hive_infra::identity::InMemoryIdentityProvider;
use hive_shared::config::AppConfig;

pub const EMAIL: &str = "ada@uni.edu";
pub const PASSWORD: &str = "correct-horse-1";

/// App state over in-memory backends, rate limiting off unless overridden
pub fn test_state(overrides: &[(&str, &str)]) -> (web::Data<AppState>, Arc<InMemoryIdentityProvider>) {
    let mut pairs: Vec<(String, String)> = vec![("RATE_LIMIT_ENABLED".into(), "false".into())];
    pairs.extend(overrides.iter().map(|(k, v)| (k.to_string(), v.to_string())));

    let config = AppConfig::from_lookup(move |key| {
        pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("test configuration loads");

    let identity = Arc::new(InMemoryIdentityProvider::new().with_hash_cost(4));
    let state = assemble_state(config, Backends::in_memory(identity.clone()))
        .expect("state assembles");

    (web::Data::new(state), identity)
}

pub fn register_body() -> Value {
    json!({
        "email": EMAIL,
        "password": PASSWORD,
        "first_name": "Ada",
        "last_name": "Lovelace"
    })
}

pub fn post_json(uri: &str, body: &Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn body_json<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    test::read_body_json(resp).await
}
