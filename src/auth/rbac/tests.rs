//! Tests for RBAC functionality

use super::catalog::PERMISSION_CATALOG;
use super::RbacSystem;
use crate::config::RbacConfig;
use crate::core::models::{NewUser, RoleChanges, UserId};
use crate::storage::{Directory, InMemoryDirectory, seed};
use crate::utils::error::GateError;
use std::sync::Arc;

async fn create_test_rbac() -> (RbacSystem, Arc<InMemoryDirectory>) {
    let directory = Arc::new(InMemoryDirectory::new());
    let config = RbacConfig::default();
    seed::ensure_catalog(directory.as_ref(), &config).await.unwrap();

    (RbacSystem::new(&config, directory.clone()), directory)
}

async fn add_user(directory: &InMemoryDirectory, username: &str, role: &str) -> UserId {
    let role = directory.find_role_by_name(role).await.unwrap().unwrap();
    directory
        .create_user(NewUser {
            username: username.to_string(),
            email: format!("{}@x.com", username),
            password_hash: "hash".to_string(),
            role_id: role.id,
            is_active: true,
        })
        .await
        .unwrap()
}

// ==================== Permission Checks ====================

#[tokio::test]
async fn test_admin_holds_every_permission() {
    let (rbac, directory) = create_test_rbac().await;
    let admin = add_user(&directory, "root", "admin").await;

    let permissions = rbac.get_user_permissions(admin).await.unwrap();
    assert_eq!(permissions.len(), PERMISSION_CATALOG.len());
    for entry in PERMISSION_CATALOG {
        assert!(rbac.check_permission(admin, entry.name).await.unwrap());
    }
}

#[tokio::test]
async fn test_default_role_holds_nothing() {
    let (rbac, directory) = create_test_rbac().await;
    let user = add_user(&directory, "alice", "user").await;

    assert!(rbac.get_user_permissions(user).await.unwrap().is_empty());
    assert!(!rbac.check_permission(user, "view_users").await.unwrap());
}

#[tokio::test]
async fn test_check_tracks_role_changes() {
    let (rbac, directory) = create_test_rbac().await;
    let user = add_user(&directory, "alice", "user").await;
    let admin_role = directory.find_role_by_name("admin").await.unwrap().unwrap();
    let user_role = directory.find_role_by_name("user").await.unwrap().unwrap();

    assert!(!rbac.check_permission(user, "manage_roles").await.unwrap());

    rbac.assign_role_to_user(user, admin_role.id).await.unwrap();
    assert!(rbac.check_permission(user, "manage_roles").await.unwrap());
    assert!(rbac.is_admin(user).await.unwrap());

    rbac.assign_role_to_user(user, user_role.id).await.unwrap();
    assert!(!rbac.check_permission(user, "manage_roles").await.unwrap());
    assert!(!rbac.is_admin(user).await.unwrap());
}

#[tokio::test]
async fn test_unknown_permission_denied() {
    let (rbac, directory) = create_test_rbac().await;
    let admin = add_user(&directory, "root", "admin").await;

    assert!(!rbac.check_permission(admin, "launch_missiles").await.unwrap());
    assert!(!rbac.check_permission(admin, "").await.unwrap());
}

#[tokio::test]
async fn test_unknown_user_has_no_permissions() {
    let (rbac, _) = create_test_rbac().await;

    assert!(rbac.get_user_permissions(9999).await.unwrap().is_empty());
    assert!(!rbac.check_permission(9999, "view_users").await.unwrap());
    assert_eq!(rbac.get_user_role_name(9999).await.unwrap(), None);
}

// ==================== Role Management ====================

#[tokio::test]
async fn test_create_role_conflict() {
    let (rbac, _) = create_test_rbac().await;

    let role = rbac
        .create_role("auditor", Some("Reads logs".to_string()))
        .await
        .unwrap();
    assert_eq!(role.name, "auditor");

    let duplicate = rbac.create_role("auditor", None).await;
    assert!(matches!(duplicate, Err(GateError::Conflict(_))));
}

#[tokio::test]
async fn test_update_role() {
    let (rbac, _) = create_test_rbac().await;
    let role = rbac.create_role("auditor", None).await.unwrap();

    let updated = rbac
        .update_role(
            role.id,
            RoleChanges {
                description: Some("Reads logs".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "auditor");
    assert_eq!(updated.description.as_deref(), Some("Reads logs"));
}

#[tokio::test]
async fn test_update_role_errors() {
    let (rbac, _) = create_test_rbac().await;
    let role = rbac.create_role("auditor", None).await.unwrap();

    let empty = rbac.update_role(role.id, RoleChanges::default()).await;
    assert!(matches!(empty, Err(GateError::InvalidRequest(msg)) if msg == "No fields to update"));

    // Empty update is rejected even for a missing role
    let empty_missing = rbac.update_role(9999, RoleChanges::default()).await;
    assert!(matches!(empty_missing, Err(GateError::InvalidRequest(_))));

    let missing = rbac
        .update_role(
            9999,
            RoleChanges {
                name: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(missing, Err(GateError::NotFound(_))));

    let taken = rbac
        .update_role(
            role.id,
            RoleChanges {
                name: Some("admin".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(GateError::Conflict(_))));
}

#[tokio::test]
async fn test_get_role() {
    let (rbac, _) = create_test_rbac().await;
    let admin = rbac.find_role_by_name("admin").await.unwrap().unwrap();

    let details = rbac.get_role(admin.id).await.unwrap();
    assert_eq!(details.permissions.len(), PERMISSION_CATALOG.len());
    assert!(matches!(rbac.get_role(9999).await, Err(GateError::NotFound(_))));
}

#[tokio::test]
async fn test_list_roles_with_counts() {
    let (rbac, directory) = create_test_rbac().await;
    add_user(&directory, "alice", "user").await;
    add_user(&directory, "bob", "user").await;
    add_user(&directory, "root", "admin").await;

    let roles = rbac.list_roles().await.unwrap();
    let names: Vec<_> = roles.iter().map(|r| r.role.name.as_str()).collect();
    assert_eq!(names, vec!["admin", "user", "moderator"]);

    assert_eq!(roles[0].user_count, 1);
    assert_eq!(roles[0].permissions.len(), PERMISSION_CATALOG.len());
    assert_eq!(roles[1].user_count, 2);
    assert!(roles[1].permissions.is_empty());
    assert_eq!(roles[2].user_count, 0);

    assert_eq!(rbac.roles_count().await.unwrap(), 3);
    assert_eq!(rbac.users_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_assign_role_validates_targets() {
    let (rbac, directory) = create_test_rbac().await;
    let user = add_user(&directory, "alice", "user").await;
    let admin_role = rbac.find_role_by_name("admin").await.unwrap().unwrap();

    let bad_role = rbac.assign_role_to_user(user, 9999).await;
    assert!(matches!(bad_role, Err(GateError::NotFound(msg)) if msg == "Role not found"));

    let bad_user = rbac.assign_role_to_user(9999, admin_role.id).await;
    assert!(matches!(bad_user, Err(GateError::NotFound(msg)) if msg == "User not found"));

    assert_eq!(
        rbac.get_user_role_name(user).await.unwrap().as_deref(),
        Some("user")
    );
}

// ==================== Catalog ====================

#[tokio::test]
async fn test_list_permissions_ordered() {
    let (rbac, _) = create_test_rbac().await;

    let permissions = rbac.list_permissions().await.unwrap();
    assert_eq!(permissions.len(), PERMISSION_CATALOG.len());

    let keys: Vec<_> = permissions
        .iter()
        .map(|p| (p.category.clone(), p.name.clone()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(permissions[0].name, "manage_audit_logs");
    assert_eq!(permissions[0].category, "audit");
}
