//! Type definitions shared by every layer
//!
//! - `response` - The JSON envelope and the health check payload

pub mod response;

pub use response::{ApiResponse, HealthResponse};
