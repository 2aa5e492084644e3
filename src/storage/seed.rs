//! Initial catalog and bootstrap account
//!
//! Seeding is idempotent: running it against an initialized directory leaves
//! the existing state untouched apart from restoring admin grants.

use super::Directory;
use crate::auth::rbac::catalog::{
    ADMIN_ROLE_DESCRIPTION, DEFAULT_ROLE_DESCRIPTION, MODERATOR_ROLE, MODERATOR_ROLE_DESCRIPTION,
    PERMISSION_CATALOG,
};
use crate::config::{AuthConfig, RbacConfig};
use crate::core::models::{NewPermission, NewRole, NewUser, Role, UserId};
use crate::utils::crypto::hash_password;
use crate::utils::error::{GateError, Result};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// What a seeding pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub permissions_created: usize,
    pub roles_created: usize,
    pub grants_added: usize,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        self.permissions_created == 0 && self.roles_created == 0 && self.grants_added == 0
    }
}

/// Seed the permission catalog and the default roles.
///
/// The catalog is written only when the directory has no permissions yet.
/// The admin role always ends up holding every permission in the directory.
pub async fn ensure_catalog(directory: &dyn Directory, rbac: &RbacConfig) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if directory.list_all_permissions().await?.is_empty() {
        for entry in PERMISSION_CATALOG {
            directory
                .create_permission(NewPermission {
                    name: entry.name.to_string(),
                    description: Some(entry.description.to_string()),
                    category: entry.category.to_string(),
                })
                .await?;
            report.permissions_created += 1;
        }
        info!("Seeded {} permissions", report.permissions_created);
    } else {
        debug!("Permission catalog already present, skipping");
    }

    let admin = ensure_role(
        directory,
        &rbac.admin_role,
        ADMIN_ROLE_DESCRIPTION,
        &mut report,
    )
    .await?;
    ensure_role(
        directory,
        &rbac.default_role,
        DEFAULT_ROLE_DESCRIPTION,
        &mut report,
    )
    .await?;
    ensure_role(directory, MODERATOR_ROLE, MODERATOR_ROLE_DESCRIPTION, &mut report).await?;

    let granted: BTreeSet<i32> = directory
        .list_permissions_for_role(admin.id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    for permission in directory.list_all_permissions().await? {
        if !granted.contains(&permission.id) {
            directory.grant_permission(admin.id, permission.id).await?;
            report.grants_added += 1;
        }
    }

    if report.grants_added > 0 {
        info!(
            "Granted {} permissions to role '{}'",
            report.grants_added, admin.name
        );
    }

    Ok(report)
}

async fn ensure_role(
    directory: &dyn Directory,
    name: &str,
    description: &str,
    report: &mut SeedReport,
) -> Result<Role> {
    if let Some(role) = directory.find_role_by_name(name).await? {
        return Ok(role);
    }

    let role = directory
        .create_role(NewRole {
            name: name.to_string(),
            description: Some(description.to_string()),
        })
        .await?;
    report.roles_created += 1;
    info!("Seeded role '{}'", role.name);
    Ok(role)
}

/// Create the bootstrap administrator unless that username already exists.
///
/// Returns the new account's id, or `None` when nothing was created.
pub async fn ensure_bootstrap_admin(
    directory: &dyn Directory,
    auth: &AuthConfig,
) -> Result<Option<UserId>> {
    let account = &auth.bootstrap;

    if directory
        .find_user_by_username(&account.username)
        .await?
        .is_some()
    {
        debug!("Bootstrap admin '{}' already exists", account.username);
        return Ok(None);
    }

    let admin_role = directory
        .find_role_by_name(&auth.rbac.admin_role)
        .await?
        .ok_or_else(|| GateError::not_found("Role not found"))?;

    let id = directory
        .create_user(NewUser {
            username: account.username.clone(),
            email: account.email.clone(),
            password_hash: hash_password(&account.password)?,
            role_id: admin_role.id,
            is_active: true,
        })
        .await?;

    info!("Created bootstrap admin '{}' ({})", account.username, id);
    Ok(Some(id))
}

/// Full initialization: catalog, roles and bootstrap admin
pub async fn initialize(directory: &dyn Directory, auth: &AuthConfig) -> Result<SeedReport> {
    let report = ensure_catalog(directory, &auth.rbac).await?;
    ensure_bootstrap_admin(directory, auth).await?;
    Ok(report)
}
