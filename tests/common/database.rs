//! Test database utilities
//!
//! Each test gets an isolated in-memory SQLite directory through SeaORM.

use super::test_auth_config;
use rbac_gate::config::DatabaseConfig;
use rbac_gate::storage::{SeaOrmDirectory, seed};
use rbac_gate::{AuthSystem, Directory};
use std::sync::Arc;

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<SeaOrmDirectory>,
}

impl TestDatabase {
    /// Open an in-memory database without running migrations
    pub async fn unmigrated() -> Self {
        let directory = SeaOrmDirectory::connect(&memory_config())
            .await
            .expect("Failed to create in-memory test database");

        Self {
            inner: Arc::new(directory),
        }
    }

    /// Create a migrated, empty in-memory database
    pub async fn new() -> Self {
        let db = Self::unmigrated().await;
        db.inner
            .migrate()
            .await
            .expect("Failed to run database migrations");
        db
    }

    /// Create a database holding the catalog, default roles and bootstrap admin
    pub async fn seeded() -> Self {
        let db = Self::new().await;
        seed::initialize(db.directory().as_ref(), &test_auth_config())
            .await
            .expect("Failed to seed test database");
        db
    }

    pub fn directory(&self) -> Arc<dyn Directory> {
        self.inner.clone()
    }

    pub fn seaorm(&self) -> &SeaOrmDirectory {
        &self.inner
    }

    /// Auth system over this database using the test configuration
    pub fn auth(&self) -> AuthSystem {
        AuthSystem::new(&test_auth_config(), self.directory()).expect("valid auth config")
    }
}

/// In-memory SQLite only supports a single connection
pub fn memory_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout: 5,
    }
}
