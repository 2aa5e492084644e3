//! Access-control scenarios over a migrated database

use crate::common::{TestDatabase, login_as, test_auth_config};
use rbac_gate::core::models::{CreateUserRequest, NewAuditEntry, RoleChanges};
use rbac_gate::{AdminService, AuditLogger, AuthSystem, GateError};
use std::sync::Arc;

#[tokio::test]
async fn test_alice_promotion() {
    let db = TestDatabase::seeded().await;
    let auth = db.auth();

    let alice = auth.register("alice", "alice@x.com", "pw1").await.unwrap();
    assert_eq!(alice.role_name.as_deref(), Some("user"));

    let token = auth.login("alice", "pw1").await.unwrap();
    let ctx = auth.resolve(&token.access_token, None).await.unwrap();
    assert_eq!(ctx.username(), "alice");

    assert!(!auth.rbac().check_permission(alice.id, "manage_roles").await.unwrap());

    let admin_role = auth.rbac().find_role_by_name("admin").await.unwrap().unwrap();
    auth.rbac()
        .assign_role_to_user(alice.id, admin_role.id)
        .await
        .unwrap();

    assert!(auth.rbac().check_permission(alice.id, "manage_roles").await.unwrap());
    assert!(auth.is_admin(alice.id).await.unwrap());
}

#[tokio::test]
async fn test_register_conflict_order() {
    let db = TestDatabase::seeded().await;
    let auth = db.auth();
    auth.register("alice", "alice@x.com", "pw1").await.unwrap();

    let err = crate::assert_err!(auth.register("alice", "alice@x.com", "pw1").await);
    assert!(matches!(err, GateError::Conflict(msg) if msg == "Username already registered"));

    let err = crate::assert_err!(auth.register("bob", "alice@x.com", "pw1").await);
    assert!(matches!(err, GateError::Conflict(msg) if msg == "Email already registered"));
}

#[tokio::test]
async fn test_token_from_another_deployment_rejected() {
    let db = TestDatabase::seeded().await;
    let auth = db.auth();

    let mut other_config = test_auth_config();
    other_config.jwt_secret = "A-Completely-Different-Secret-9876543210zz".to_string();
    let other = AuthSystem::new(&other_config, db.directory()).unwrap();

    let foreign = other.login("admin", "admin123").await.unwrap();
    let err = crate::assert_err!(auth.resolve(&foreign.access_token, None).await);
    assert!(matches!(err, GateError::Unauthorized(_)));
}

#[tokio::test]
async fn test_admin_service_end_to_end() {
    let db = TestDatabase::seeded().await;
    let auth = Arc::new(db.auth());
    let admin = AdminService::new(auth.clone());

    auth.register("alice", "alice@x.com", "pw1").await.unwrap();
    let root = login_as(&auth, "admin", "admin123").await;
    let alice = login_as(&auth, "alice", "pw1").await;

    // Alice holds no grants
    let err = crate::assert_err!(admin.list_users(&alice, 1, 10).await);
    assert!(matches!(err, GateError::Forbidden(_)));

    let auditor = crate::assert_ok!(
        admin
            .create_role(&root, "auditor", Some("Reads the audit trail".to_string()))
            .await
    );
    let renamed = crate::assert_ok!(
        admin
            .update_role(
                &root,
                auditor.id,
                RoleChanges {
                    name: Some("reviewer".to_string()),
                    ..Default::default()
                },
            )
            .await
    );
    assert_eq!(renamed.name, "reviewer");

    let empty = crate::assert_err!(
        admin
            .update_role(&root, auditor.id, RoleChanges::default())
            .await
    );
    assert!(matches!(empty, GateError::InvalidRequest(_)));

    let bob = crate::assert_ok!(
        admin
            .create_user(
                &root,
                CreateUserRequest {
                    username: "bob".to_string(),
                    email: "bob@x.com".to_string(),
                    password: "pw2".to_string(),
                    role_id: Some(auditor.id),
                    is_active: Some(true),
                },
            )
            .await
    );
    assert_eq!(bob.role_name.as_deref(), Some("reviewer"));

    let page = crate::assert_ok!(admin.search_users(&root, "review", 1, 10).await);
    assert_eq!(page.total, 1);
    assert_eq!(page.users[0].username, "bob");

    let own = crate::assert_err!(admin.delete_user(&root, root.user_id()).await);
    assert!(matches!(own, GateError::SelfActionDenied(_)));

    crate::assert_ok!(admin.delete_user(&root, bob.id).await);
    let gone = crate::assert_err!(admin.delete_user(&root, bob.id).await);
    assert!(matches!(gone, GateError::NotFound(_)));

    let actions: Vec<_> = crate::assert_ok!(admin.recent_audit(&root, 10).await)
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        vec!["delete_user", "create_user", "update_role", "create_role"]
    );
}

#[tokio::test]
async fn test_deactivated_user_loses_access() {
    let db = TestDatabase::seeded().await;
    let auth = Arc::new(db.auth());
    let admin = AdminService::new(auth.clone());

    let alice = auth.register("alice", "alice@x.com", "pw1").await.unwrap();
    let token = auth.login("alice", "pw1").await.unwrap().access_token;
    let root = login_as(&auth, "admin", "admin123").await;

    admin
        .update_user(
            &root,
            alice.id,
            rbac_gate::core::models::UserUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(auth.authenticate("alice", "pw1").await.unwrap().is_none());
    let err = crate::assert_err!(auth.resolve(&token, None).await);
    assert!(matches!(err, GateError::Unauthorized(_)));
}

#[tokio::test]
async fn test_audit_failure_is_swallowed() {
    let db = TestDatabase::unmigrated().await;
    let logger = AuditLogger::new(db.directory());

    // No audit table: the write fails and is only logged
    logger
        .record(NewAuditEntry {
            action: "create_role".to_string(),
            entity_type: "role".to_string(),
            ..Default::default()
        })
        .await;

    assert!(logger.recent(10).await.is_err());
}
