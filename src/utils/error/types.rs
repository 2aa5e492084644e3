//! Error types for rbac-gate

use thiserror::Error;

/// Result type alias for rbac-gate
pub type Result<T> = std::result::Result<T, GateError>;

/// Main error type for rbac-gate
///
/// The first six domain variants are user-visible outcomes and must never be
/// folded into one another; everything below them is infrastructure.
#[derive(Error, Debug)]
pub enum GateError {
    /// Referenced role, user or other entity is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation on username, email or role name
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Structurally invalid request (e.g. partial update with no fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing, invalid or expired token, or failed credential check
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid identity lacking the required permission or role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An actor attempted an operation on their own account that is not allowed
    #[error("Self action denied: {0}")]
    SelfActionDenied(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JWT encoding errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
