//! # rbac-gate
//!
//! Authentication and role-based access control for multi-user services.
//!
//! ## Features
//!
//! - **Credentials**: Argon2 password hashing with constant-time verification
//! - **Bearer tokens**: HS256 JWTs with strict expiry
//! - **RBAC engine**: roles, a fixed permission catalog and uncached permission checks
//! - **Audit trail**: append-only record of privileged mutations
//! - **Storage**: SeaORM directory (SQLite or Postgres) or an in-memory directory
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rbac_gate::{AuthSystem, Config, storage::{SeaOrmDirectory, seed}};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/rbac-gate.yaml").await?;
//!
//!     let directory = SeaOrmDirectory::connect(&config.storage.database).await?;
//!     directory.migrate().await?;
//!     seed::initialize(&directory, &config.auth).await?;
//!
//!     let auth = AuthSystem::new(&config.auth, Arc::new(directory))?;
//!     let token = auth.login("admin", "admin123").await?;
//!     let ctx = auth.resolve(&token.access_token, None).await?;
//!     auth.require_permission(&ctx, "view_users").await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod audit;
pub mod auth;
pub mod config;
pub mod core;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use audit::{AuditAction, AuditLogger};
pub use auth::{AuthContext, AuthSystem, JwtHandler, RbacSystem, TokenResponse};
pub use config::Config;
pub use services::{AdminService, UserService};
pub use storage::{Directory, InMemoryDirectory, SeaOrmDirectory};
pub use utils::error::{GateError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "rbac-gate");
    }
}
