//! Role-Based Access Control (RBAC) engine
//!
//! Single-level and single-role: each user holds exactly one role, a role is a
//! plain set of permission names, and a check is a set-membership test against
//! the directory's current state. Nothing is cached between calls.

pub mod catalog;
mod permissions;
mod roles;
mod system;
#[cfg(test)]
mod tests;

pub use catalog::{CatalogPermission, PERMISSION_CATALOG, names};
pub use system::RbacSystem;
