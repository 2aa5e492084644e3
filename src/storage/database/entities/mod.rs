/// Audit log entity module
pub mod audit_log;
/// Permission entity module
pub mod permission;
/// Role entity module
pub mod role;
/// Role/permission association entity module
pub mod role_permission;
/// User entity module
pub mod user;

pub use audit_log::Entity as AuditLog;
pub use permission::Entity as Permission;
pub use role::Entity as Role;
pub use role_permission::Entity as RolePermission;
pub use user::Entity as User;
