//! Configuration data models

#![allow(missing_docs)]

pub mod auth;
pub mod logging;
pub mod storage;

pub use auth::*;
pub use logging::*;
pub use storage::*;

/// Default token lifetime in seconds (30 minutes)
pub fn default_jwt_expiration() -> u64 {
    30 * 60
}

/// Default token issuer
pub fn default_issuer() -> String {
    "rbac-gate".to_string()
}

/// Default role for newly registered users
pub fn default_role() -> String {
    "user".to_string()
}

/// Default privileged role
pub fn default_admin_role() -> String {
    "admin".to_string()
}

/// Default database URL
pub fn default_database_url() -> String {
    "sqlite://rbac-gate.db?mode=rwc".to_string()
}

/// Default maximum database connections
pub fn default_max_connections() -> u32 {
    10
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    30
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}
