//! Authentication service module
//!
//! This module provides the credential flows of the API:
//! - Single-step registration and login
//! - Two-step registration and login confirmed by an emailed code
//! - Token refresh and logout
//! - Password reset requests

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::{AuthService, NewRegistration};
