//! SeaORM directory tests

use crate::common::TestDatabase;
use rbac_gate::GateError;
use rbac_gate::auth::rbac::PERMISSION_CATALOG;
use rbac_gate::core::models::{NewAuditEntry, NewRole, NewUser, RoleChanges, UserChanges};
use rbac_gate::storage::database::DatabaseBackendType;

fn new_user(username: &str, email: &str, role_id: i32) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role_id,
        is_active: true,
    }
}

#[tokio::test]
async fn test_backend_detected() {
    let db = TestDatabase::new().await;
    assert_eq!(db.seaorm().backend_type(), DatabaseBackendType::SQLite);
}

#[tokio::test]
async fn test_seed_produces_catalog() {
    let db = TestDatabase::seeded().await;
    let dir = db.directory();

    let permissions = dir.list_all_permissions().await.unwrap();
    assert_eq!(permissions.len(), PERMISSION_CATALOG.len());

    let keys: Vec<_> = permissions
        .iter()
        .map(|p| (p.category.as_str(), p.name.as_str()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(keys.first(), Some(&("audit", "manage_audit_logs")));
    assert_eq!(keys.last(), Some(&("user", "view_users")));

    let roles: Vec<_> = dir
        .list_roles()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(roles, vec!["admin", "user", "moderator"]);

    let admin = dir.find_role_by_name("admin").await.unwrap().unwrap();
    assert_eq!(
        dir.list_permissions_for_role(admin.id).await.unwrap(),
        permissions
    );
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let db = TestDatabase::seeded().await;

    let report = rbac_gate::storage::seed::initialize(
        db.directory().as_ref(),
        &crate::common::test_auth_config(),
    )
    .await
    .unwrap();
    assert!(report.is_noop());
    assert_eq!(db.directory().count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_unique_constraints_surface_as_conflict() {
    let db = TestDatabase::seeded().await;
    let dir = db.directory();
    let role = dir.find_role_by_name("user").await.unwrap().unwrap();

    dir.create_user(new_user("alice", "alice@x.com", role.id))
        .await
        .unwrap();

    let by_name = dir
        .create_user(new_user("alice", "other@x.com", role.id))
        .await;
    assert!(
        matches!(by_name, Err(GateError::Conflict(msg)) if msg == "Username already registered")
    );

    let by_email = dir
        .create_user(new_user("alice2", "alice@x.com", role.id))
        .await;
    assert!(matches!(by_email, Err(GateError::Conflict(msg)) if msg == "Email already registered"));

    let bob = dir
        .create_user(new_user("bob", "bob@x.com", role.id))
        .await
        .unwrap();
    let taken = dir
        .update_user(
            bob,
            UserChanges {
                email: Some("alice@x.com".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(GateError::Conflict(msg)) if msg == "Email already registered"));

    let role_dup = dir
        .create_role(NewRole {
            name: "user".to_string(),
            description: None,
        })
        .await;
    assert!(matches!(role_dup, Err(GateError::Conflict(_))));
}

#[tokio::test]
async fn test_usernames_case_sensitive() {
    let db = TestDatabase::seeded().await;
    let dir = db.directory();
    let role = dir.find_role_by_name("user").await.unwrap().unwrap();

    dir.create_user(new_user("alice", "a1@x.com", role.id))
        .await
        .unwrap();
    dir.create_user(new_user("Alice", "a2@x.com", role.id))
        .await
        .unwrap();

    let found = dir.find_user_by_username("Alice").await.unwrap().unwrap();
    assert_eq!(found.email, "a2@x.com");
}

#[tokio::test]
async fn test_create_user_with_missing_role_fails() {
    let db = TestDatabase::seeded().await;

    let result = db
        .directory()
        .create_user(new_user("ghost", "ghost@x.com", 9999))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_update_and_delete_missing_user() {
    let db = TestDatabase::seeded().await;
    let dir = db.directory();

    let update = dir
        .update_user(
            9999,
            UserChanges {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(GateError::NotFound(_))));

    let delete = dir.delete_user(9999).await;
    assert!(matches!(delete, Err(GateError::NotFound(_))));

    let role = dir
        .update_role(
            9999,
            RoleChanges {
                name: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(role, Err(GateError::NotFound(_))));
}

#[tokio::test]
async fn test_users_carry_role_name() {
    let db = TestDatabase::seeded().await;
    let dir = db.directory();

    let admin = dir.find_user_by_username("admin").await.unwrap().unwrap();
    assert_eq!(admin.role_name.as_deref(), Some("admin"));

    let listed = dir.list_users(0, 10).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].role_name.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_search_and_paging() {
    let db = TestDatabase::seeded().await;
    let dir = db.directory();
    let role = dir.find_role_by_name("moderator").await.unwrap().unwrap();

    for name in ["carol", "bob", "dave"] {
        dir.create_user(new_user(name, &format!("{}@corp.io", name), role.id))
            .await
            .unwrap();
    }

    // Role name matches
    let moderators = dir.search_users("moder", 0, 10).await.unwrap();
    let names: Vec<_> = moderators.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["bob", "carol", "dave"]);
    assert_eq!(dir.count_search("moder").await.unwrap(), 3);

    // Email matches, case-insensitive
    assert_eq!(dir.count_search("CORP.IO").await.unwrap(), 3);

    let second_page = dir.search_users("corp", 1, 1).await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].username, "carol");

    let by_id = dir.list_users(1, 2).await.unwrap();
    let names: Vec<_> = by_id.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["carol", "bob"]);
    assert_eq!(dir.count_users().await.unwrap(), 4);
}

#[tokio::test]
async fn test_role_member_counts() {
    let db = TestDatabase::seeded().await;
    let dir = db.directory();
    let user_role = dir.find_role_by_name("user").await.unwrap().unwrap();

    dir.create_user(new_user("alice", "alice@x.com", user_role.id))
        .await
        .unwrap();

    assert_eq!(dir.count_users_with_role(user_role.id).await.unwrap(), 1);
    assert_eq!(dir.count_roles().await.unwrap(), 3);
}

#[tokio::test]
async fn test_grant_is_idempotent() {
    let db = TestDatabase::seeded().await;
    let dir = db.directory();
    let admin = dir.find_role_by_name("admin").await.unwrap().unwrap();
    let permission = dir.list_all_permissions().await.unwrap().remove(0);

    dir.grant_permission(admin.id, permission.id).await.unwrap();
    dir.grant_permission(admin.id, permission.id).await.unwrap();

    assert_eq!(
        dir.list_permissions_for_role(admin.id).await.unwrap().len(),
        PERMISSION_CATALOG.len()
    );
}

#[tokio::test]
async fn test_audit_entries_newest_first_and_survive_actor_deletion() {
    let db = TestDatabase::seeded().await;
    let dir = db.directory();
    let role = dir.find_role_by_name("user").await.unwrap().unwrap();
    let alice = dir
        .create_user(new_user("alice", "alice@x.com", role.id))
        .await
        .unwrap();

    for action in ["first", "second", "third"] {
        dir.append_audit_entry(NewAuditEntry {
            user_id: Some(alice),
            action: action.to_string(),
            entity_type: "user".to_string(),
            entity_id: Some(alice),
            ..Default::default()
        })
        .await
        .unwrap();
    }

    let recent = dir.list_recent_audit_entries(2).await.unwrap();
    let actions: Vec<_> = recent.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["third", "second"]);
    assert_eq!(recent[0].username.as_deref(), Some("alice"));

    dir.delete_user(alice).await.unwrap();

    let after = dir.list_recent_audit_entries(10).await.unwrap();
    assert_eq!(after.len(), 3);
    assert!(after.iter().all(|e| e.user_id.is_none() && e.username.is_none()));
}
