//! Core data models
//!
//! Plain value types returned by the directory. Storage backends convert their
//! own row representations into these before handing them to the engine.

pub mod audit;
pub mod rbac;
pub mod user;

pub use audit::*;
pub use rbac::*;
pub use user::*;

/// User identifier
pub type UserId = i32;
/// Role identifier
pub type RoleId = i32;
/// Permission identifier
pub type PermissionId = i32;
/// Audit entry identifier
pub type AuditEntryId = i32;
