//! Transport-neutral error rendering
//!
//! The HTTP layer lives outside this crate; these mappings let it render any
//! `GateError` without re-classifying it.

use super::types::GateError;
use serde::Serialize;

impl GateError {
    /// HTTP status code a transport layer should use for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GateError::NotFound(_) => 404,
            GateError::Conflict(_) => 409,
            GateError::InvalidRequest(_) => 400,
            GateError::Unauthorized(_) => 401,
            GateError::Forbidden(_) => 403,
            GateError::SelfActionDenied(_) => 400,
            _ => 500,
        }
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GateError::NotFound(_) => "NOT_FOUND",
            GateError::Conflict(_) => "CONFLICT",
            GateError::InvalidRequest(_) => "INVALID_REQUEST",
            GateError::Unauthorized(_) => "UNAUTHORIZED",
            GateError::Forbidden(_) => "FORBIDDEN",
            GateError::SelfActionDenied(_) => "SELF_ACTION_DENIED",
            GateError::Config(_) => "CONFIG_ERROR",
            GateError::Database(_) => "DATABASE_ERROR",
            GateError::Jwt(_) => "TOKEN_ERROR",
            GateError::Crypto(_) => "CRYPTO_ERROR",
            GateError::Serialization(_) | GateError::Yaml(_) => "SERIALIZATION_ERROR",
            GateError::Io(_) => "IO_ERROR",
            GateError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Build the response body. Infrastructure details are not exposed.
    pub fn to_response(&self) -> ErrorResponse {
        let message = if self.is_domain() {
            self.to_string()
        } else {
            "An internal error occurred".to_string()
        };

        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        }
    }
}

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
