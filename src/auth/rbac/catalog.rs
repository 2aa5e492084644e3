//! Fixed permission catalog and default roles

/// Permission names referenced by guarded operations
pub mod names {
    pub const MANAGE_USERS: &str = "manage_users";
    pub const VIEW_USERS: &str = "view_users";
    pub const CREATE_USER: &str = "create_user";
    pub const UPDATE_USER: &str = "update_user";
    pub const DELETE_USER: &str = "delete_user";
    pub const MANAGE_ROLES: &str = "manage_roles";
    pub const VIEW_ROLES: &str = "view_roles";
    pub const ASSIGN_ROLES: &str = "assign_roles";
    pub const MANAGE_PERMISSIONS: &str = "manage_permissions";
    pub const VIEW_PERMISSIONS: &str = "view_permissions";
    pub const MANAGE_SETTINGS: &str = "manage_settings";
    pub const VIEW_SETTINGS: &str = "view_settings";
    pub const VIEW_AUDIT_LOGS: &str = "view_audit_logs";
    pub const MANAGE_AUDIT_LOGS: &str = "manage_audit_logs";
}

use names::*;

/// One seeded permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogPermission {
    pub category: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const fn entry(
    category: &'static str,
    name: &'static str,
    description: &'static str,
) -> CatalogPermission {
    CatalogPermission {
        category,
        name,
        description,
    }
}

/// Every permission seeded at initialization, grouped by category
pub const PERMISSION_CATALOG: &[CatalogPermission] = &[
    entry("user", MANAGE_USERS, "Create, update and delete users"),
    entry("user", VIEW_USERS, "View the user list and user details"),
    entry("user", CREATE_USER, "Create new users"),
    entry("user", UPDATE_USER, "Update user information"),
    entry("user", DELETE_USER, "Delete users"),
    entry("role", MANAGE_ROLES, "Create, update and delete roles"),
    entry("role", VIEW_ROLES, "View roles and their permissions"),
    entry("role", ASSIGN_ROLES, "Assign roles to users"),
    entry("permission", MANAGE_PERMISSIONS, "Manage permission assignments"),
    entry("permission", VIEW_PERMISSIONS, "View the permission list"),
    entry("system", MANAGE_SETTINGS, "Modify system settings"),
    entry("system", VIEW_SETTINGS, "View system settings"),
    entry("audit", VIEW_AUDIT_LOGS, "View audit logs"),
    entry("audit", MANAGE_AUDIT_LOGS, "Manage audit logs"),
];

/// Description for the admin role
pub const ADMIN_ROLE_DESCRIPTION: &str = "Administrator with full access";
/// Description for the default role
pub const DEFAULT_ROLE_DESCRIPTION: &str = "Regular user with basic access";
/// Moderator role name; seeded without grants
pub const MODERATOR_ROLE: &str = "moderator";
/// Description for the moderator role
pub const MODERATOR_ROLE_DESCRIPTION: &str = "User with moderation privileges";

/// Whether `name` is part of the fixed catalog
pub fn is_catalog_permission(name: &str) -> bool {
    PERMISSION_CATALOG.iter().any(|p| p.name == name)
}
