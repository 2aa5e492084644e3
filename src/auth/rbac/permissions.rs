//! Permission checking methods

use crate::core::models::{Permission, UserId};
use crate::utils::error::Result;
use std::collections::BTreeSet;
use tracing::debug;

use super::system::RbacSystem;

impl RbacSystem {
    /// The whole catalog, ordered by category then name
    pub async fn list_permissions(&self) -> Result<Vec<Permission>> {
        self.directory.list_all_permissions().await
    }

    /// Distinct permission names granted to the user's current role.
    ///
    /// Unknown users have no permissions.
    pub async fn get_user_permissions(&self, user_id: UserId) -> Result<BTreeSet<String>> {
        let Some(user) = self.directory.find_user_by_id(user_id).await? else {
            return Ok(BTreeSet::new());
        };

        let permissions = self
            .directory
            .list_permissions_for_role(user.role_id)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();

        Ok(permissions)
    }

    /// Whether the user's current role grants `permission`
    pub async fn check_permission(&self, user_id: UserId, permission: &str) -> Result<bool> {
        let granted = self.get_user_permissions(user_id).await?.contains(permission);
        debug!(
            "Permission check: user {} / {} -> {}",
            user_id, permission, granted
        );
        Ok(granted)
    }

    /// Whether the user's current role is the configured admin role
    pub async fn is_admin(&self, user_id: UserId) -> Result<bool> {
        let role = self.get_user_role_name(user_id).await?;
        Ok(role.as_deref() == Some(self.config.admin_role.as_str()))
    }
}
