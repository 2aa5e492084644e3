//! Configuration file tests

use rbac_gate::{Config, GateError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_load_full_config() {
    let file = write_config(
        r#"
auth:
  jwt_secret: "Integration-Config-Secret-0123456789-ABCDEF"
  jwt_expiration: 3600
  issuer: "acme"
  rbac:
    default_role: "member"
    admin_role: "root"
storage:
  database:
    url: "sqlite::memory:"
    max_connections: 1
logging:
  level: "debug"
  json: true
"#,
    );

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.auth.jwt_expiration, 3600);
    assert_eq!(config.auth.issuer, "acme");
    assert_eq!(config.auth.rbac.default_role, "member");
    assert_eq!(config.auth.rbac.admin_role, "root");
    assert_eq!(config.storage.database.max_connections, 1);
    assert!(config.logging.json);
}

#[tokio::test]
async fn test_weak_secret_rejected() {
    let file = write_config(
        r#"
auth:
  jwt_secret: "short"
"#,
    );

    let err = Config::from_file(file.path()).await.unwrap_err();
    assert!(matches!(err, GateError::Config(_)));
}

#[tokio::test]
async fn test_missing_file() {
    let err = Config::from_file("/nonexistent/rbac-gate.yaml")
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::Config(_)));
}
