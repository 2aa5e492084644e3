//! Directory storage
//!
//! The engine reaches users, roles, permissions and the audit trail only
//! through the [`Directory`] trait. Two backends are provided: an in-memory
//! directory and a SeaORM-backed relational one.

/// Relational backend (SeaORM)
pub mod database;
/// In-memory backend
pub mod memory;
/// Catalog and bootstrap seeding
pub mod seed;

pub use database::SeaOrmDirectory;
pub use memory::InMemoryDirectory;

use crate::core::models::{
    AuditEntry, AuditEntryId, NewAuditEntry, NewPermission, NewRole, NewUser, Permission,
    PermissionId, Role, RoleChanges, RoleId, User, UserChanges, UserId,
};
use crate::utils::error::Result;

/// Storage interface consumed by the access-control core.
///
/// Implementations enforce uniqueness of usernames, emails, role names,
/// permission names and (role, permission) pairs themselves, surfacing
/// violations as `GateError::Conflict`. Callers' pre-checks are advisory.
#[async_trait::async_trait]
pub trait Directory: Send + Sync {
    // Users

    /// Users are returned with `role_name` resolved.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>>;
    async fn create_user(&self, user: NewUser) -> Result<UserId>;
    /// Fails with `NotFound` when the user does not exist.
    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<()>;
    /// Fails with `NotFound` when the user does not exist. Audit entries
    /// referencing the user keep their row but lose the actor reference.
    async fn delete_user(&self, id: UserId) -> Result<()>;
    /// Ordered by id.
    async fn list_users(&self, offset: u64, limit: u64) -> Result<Vec<User>>;
    async fn count_users(&self) -> Result<u64>;
    /// Substring match on username, email or role name, ordered by username.
    async fn search_users(&self, pattern: &str, offset: u64, limit: u64) -> Result<Vec<User>>;
    async fn count_search(&self, pattern: &str) -> Result<u64>;

    // Roles

    /// Ordered by id.
    async fn list_roles(&self) -> Result<Vec<Role>>;
    async fn get_role(&self, id: RoleId) -> Result<Option<Role>>;
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>>;
    async fn create_role(&self, role: NewRole) -> Result<Role>;
    /// Fails with `NotFound` when the role does not exist.
    async fn update_role(&self, id: RoleId, changes: RoleChanges) -> Result<Role>;
    async fn count_users_with_role(&self, role_id: RoleId) -> Result<u64>;
    async fn count_roles(&self) -> Result<u64>;

    // Permissions

    /// Ordered by category, then name.
    async fn list_permissions_for_role(&self, role_id: RoleId) -> Result<Vec<Permission>>;
    /// Ordered by category, then name.
    async fn list_all_permissions(&self) -> Result<Vec<Permission>>;
    /// Seeding only.
    async fn create_permission(&self, permission: NewPermission) -> Result<Permission>;
    /// Seeding only. Granting an existing pair is a no-op.
    async fn grant_permission(&self, role_id: RoleId, permission_id: PermissionId) -> Result<()>;

    // Audit trail

    async fn append_audit_entry(&self, entry: NewAuditEntry) -> Result<AuditEntryId>;
    /// Newest first, with the actor's username where it still exists.
    async fn list_recent_audit_entries(&self, limit: u64) -> Result<Vec<AuditEntry>>;
}
