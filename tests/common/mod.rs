//! Common test utilities for rbac-gate
//!
//! - In-memory SQLite directories, migrated and optionally seeded
//! - Helpers for turning credentials into an `AuthContext`
//! - Assertion macros

pub mod database;

pub use database::TestDatabase;

use rbac_gate::config::AuthConfig;
use rbac_gate::{AuthContext, AuthSystem};

/// Auth configuration with a fixed, valid secret
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "Integration-Test-Secret-0123456789-abcdefgh".to_string(),
        ..AuthConfig::default()
    }
}

/// Log in and resolve the resulting token
pub async fn login_as(auth: &AuthSystem, username: &str, password: &str) -> AuthContext {
    let token = auth
        .login(username, password)
        .await
        .expect("login should succeed");
    auth.resolve(&token.access_token, None)
        .await
        .expect("fresh token should resolve")
}

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
