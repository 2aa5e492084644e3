//! Role management methods

use crate::core::models::{NewRole, Role, RoleChanges, RoleDetails, RoleId, UserChanges, UserId};
use crate::utils::error::{GateError, Result};
use tracing::{debug, info};

use super::system::RbacSystem;

impl RbacSystem {
    /// All roles with their grants and member counts, ordered by id
    pub async fn list_roles(&self) -> Result<Vec<RoleDetails>> {
        let roles = self.directory.list_roles().await?;

        let mut details = Vec::with_capacity(roles.len());
        for role in roles {
            details.push(self.role_details(role).await?);
        }

        debug!("Listed {} roles", details.len());
        Ok(details)
    }

    /// One role with its grants
    pub async fn get_role(&self, id: RoleId) -> Result<RoleDetails> {
        let role = self
            .directory
            .get_role(id)
            .await?
            .ok_or_else(|| GateError::not_found("Role not found"))?;

        self.role_details(role).await
    }

    /// Look a role up by name
    pub async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        self.directory.find_role_by_name(name).await
    }

    /// Create a role with no grants
    pub async fn create_role(&self, name: &str, description: Option<String>) -> Result<Role> {
        if self.directory.find_role_by_name(name).await?.is_some() {
            return Err(GateError::conflict("Role name already exists"));
        }

        let role = self
            .directory
            .create_role(NewRole {
                name: name.to_string(),
                description,
            })
            .await?;

        info!("Created role '{}' ({})", role.name, role.id);
        Ok(role)
    }

    /// Apply a partial update.
    ///
    /// An empty update is rejected before the role is looked up.
    pub async fn update_role(&self, id: RoleId, changes: RoleChanges) -> Result<Role> {
        if changes.is_empty() {
            return Err(GateError::invalid_request("No fields to update"));
        }

        if let Some(name) = &changes.name {
            if let Some(existing) = self.directory.find_role_by_name(name).await? {
                if existing.id != id {
                    return Err(GateError::conflict("Role name already exists"));
                }
            }
        }

        let role = self.directory.update_role(id, changes).await?;
        info!("Updated role '{}' ({})", role.name, role.id);
        Ok(role)
    }

    /// Repoint a user's role. Both the user and the role must exist.
    pub async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> Result<()> {
        let role = self
            .directory
            .get_role(role_id)
            .await?
            .ok_or_else(|| GateError::not_found("Role not found"))?;

        if self.directory.find_user_by_id(user_id).await?.is_none() {
            return Err(GateError::not_found("User not found"));
        }

        self.directory
            .update_user(
                user_id,
                UserChanges {
                    role_id: Some(role_id),
                    ..Default::default()
                },
            )
            .await?;

        info!("Assigned role '{}' to user {}", role.name, user_id);
        Ok(())
    }

    /// Name of the user's current role
    pub async fn get_user_role_name(&self, user_id: UserId) -> Result<Option<String>> {
        Ok(self
            .directory
            .find_user_by_id(user_id)
            .await?
            .and_then(|u| u.role_name))
    }

    pub async fn roles_count(&self) -> Result<u64> {
        self.directory.count_roles().await
    }

    pub async fn users_count(&self) -> Result<u64> {
        self.directory.count_users().await
    }

    async fn role_details(&self, role: Role) -> Result<RoleDetails> {
        let permissions = self.directory.list_permissions_for_role(role.id).await?;
        let user_count = self.directory.count_users_with_role(role.id).await?;

        Ok(RoleDetails {
            role,
            permissions,
            user_count,
        })
    }
}
