//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard API response envelope
///
/// Every JSON body produced by the API, success or failure, has this shape:
/// `{success, message, data?, error?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,

    /// Human readable summary
    pub message: String,

    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Underlying error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response carrying data
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Check if the response is successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl ApiResponse<()> {
    /// Create a successful response with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

/// Health check payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Service name
    pub service: String,

    /// Crate version
    pub version: String,

    /// Check timestamp
    pub timestamp: DateTime<Utc>,

    /// Database reachability, `None` when running without a database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<bool>,
}

impl HealthResponse {
    pub fn new(service: impl Into<String>, version: impl Into<String>, database: Option<bool>) -> Self {
        let status = if database == Some(false) { "degraded" } else { "healthy" };
        Self {
            status: status.to_string(),
            service: service.into(),
            version: version.into(),
            timestamp: Utc::now(),
            database,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
