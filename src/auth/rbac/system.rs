//! RBAC system core functionality

use crate::config::RbacConfig;
use crate::storage::Directory;
use std::sync::Arc;
use tracing::info;

/// RBAC engine over a directory
#[derive(Clone)]
pub struct RbacSystem {
    /// RBAC configuration
    pub(super) config: RbacConfig,
    /// Backing directory
    pub(super) directory: Arc<dyn Directory>,
}

impl std::fmt::Debug for RbacSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbacSystem")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RbacSystem {
    /// Create a new RBAC system
    pub fn new(config: &RbacConfig, directory: Arc<dyn Directory>) -> Self {
        info!(
            "Initializing RBAC system (default role '{}', admin role '{}')",
            config.default_role, config.admin_role
        );

        Self {
            config: config.clone(),
            directory,
        }
    }

    /// RBAC configuration
    pub fn config(&self) -> &RbacConfig {
        &self.config
    }
}
