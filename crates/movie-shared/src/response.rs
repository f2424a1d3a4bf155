//! Standardized API response bodies.

use serde::{Deserialize, Serialize};

/// Machine-readable error codes carried in [`ErrorResponse::error_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    InternalError,
}

/// Error body returned by every failing route.
///
/// ```json
/// { "error_code": "BAD_REQUEST", "error": "title or genre is missing!" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: ErrorCode,

    /// Human-readable message.
    pub error: String,

    /// Request ID for debugging purposes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(error_code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error_code,
            error: error.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    // Common error constructors
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, error)
    }

    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, error)
    }

    pub fn conflict(error: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, error)
    }

    pub fn internal_error() -> Self {
        Self::new(ErrorCode::InternalError, "Internal server error")
    }
}

/// Static identity payload served at the root route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: bool,
}

impl ServiceInfo {
    pub fn running(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            status: true,
        }
    }
}
