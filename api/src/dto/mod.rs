//! Data transfer objects for the HTTP API

pub mod auth;

use validator::{Validate, ValidationErrors};

use crate::handlers::error::ApiError;

/// Run `validator` checks and report failures as a validation error
pub fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request
        .validate()
        .map_err(|errors| ApiError::validation(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
