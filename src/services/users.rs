//! User management service

use crate::config::RbacConfig;
use crate::core::models::{
    CreateUserRequest, NewUser, Role, RoleId, UserChanges, UserId, UserInfo, UserPage, UserUpdate,
};
use crate::storage::Directory;
use crate::utils::crypto::hash_password;
use crate::utils::error::{GateError, Result};
use std::sync::Arc;
use tracing::{debug, info};

use super::page_window;

/// User administration over a directory.
///
/// Performs no permission checks of its own; see `AdminService` for the
/// guarded surface.
#[derive(Clone)]
pub struct UserService {
    directory: Arc<dyn Directory>,
    config: RbacConfig,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(directory: Arc<dyn Directory>, config: &RbacConfig) -> Self {
        Self {
            directory,
            config: config.clone(),
        }
    }

    /// Users ordered by id, one page at a time
    pub async fn list_users(&self, page: u64, page_size: u64) -> Result<UserPage> {
        let (offset, limit) = page_window(page, page_size)?;

        let users = self.directory.list_users(offset, limit).await?;
        let total = self.directory.count_users().await?;

        Ok(UserPage {
            users: users.into_iter().map(UserInfo::from).collect(),
            total,
            page,
            page_size,
        })
    }

    /// Substring search on username, email or role name, ordered by username
    pub async fn search_users(&self, query: &str, page: u64, page_size: u64) -> Result<UserPage> {
        let (offset, limit) = page_window(page, page_size)?;
        debug!("Searching users: '{}' page {}", query, page);

        let users = self.directory.search_users(query, offset, limit).await?;
        let total = self.directory.count_search(query).await?;

        Ok(UserPage {
            users: users.into_iter().map(UserInfo::from).collect(),
            total,
            page,
            page_size,
        })
    }

    pub async fn get_user(&self, id: UserId) -> Result<UserInfo> {
        self.directory
            .find_user_by_id(id)
            .await?
            .map(UserInfo::from)
            .ok_or_else(|| GateError::not_found("User not found"))
    }

    /// Create an account on behalf of an administrator.
    ///
    /// Uniqueness is checked username first, then email.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserInfo> {
        if self
            .directory
            .find_user_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(GateError::conflict("Username already registered"));
        }
        if self
            .directory
            .find_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(GateError::conflict("Email already registered"));
        }

        let role = match request.role_id {
            Some(role_id) => self.existing_role(role_id).await?,
            None => self
                .directory
                .find_role_by_name(&self.config.default_role)
                .await?
                .ok_or_else(|| GateError::not_found("Role not found"))?,
        };

        let id = self
            .directory
            .create_user(NewUser {
                username: request.username,
                email: request.email,
                password_hash: hash_password(&request.password)?,
                role_id: role.id,
                is_active: request.is_active.unwrap_or(true),
            })
            .await?;

        info!("Created user {} with role '{}'", id, role.name);
        self.get_user(id).await
    }

    /// Apply a partial update. A new password is re-hashed.
    pub async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<UserInfo> {
        if update.is_empty() {
            return Err(GateError::invalid_request("No fields to update"));
        }

        if self.directory.find_user_by_id(id).await?.is_none() {
            return Err(GateError::not_found("User not found"));
        }

        if let Some(email) = &update.email {
            if let Some(other) = self.directory.find_user_by_email(email).await? {
                if other.id != id {
                    return Err(GateError::conflict("Email already registered"));
                }
            }
        }

        if let Some(role_id) = update.role_id {
            self.existing_role(role_id).await?;
        }

        let password_hash = match &update.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        self.directory
            .update_user(
                id,
                UserChanges {
                    email: update.email,
                    password_hash,
                    role_id: update.role_id,
                    is_active: update.is_active,
                    last_login: None,
                },
            )
            .await?;

        info!("Updated user {}", id);
        self.get_user(id).await
    }

    /// Delete an account. Actors cannot delete themselves.
    pub async fn delete_user(&self, actor_id: UserId, id: UserId) -> Result<()> {
        if actor_id == id {
            return Err(GateError::self_action_denied("Cannot delete your own account"));
        }

        self.directory.delete_user(id).await?;
        info!("Deleted user {}", id);
        Ok(())
    }

    async fn existing_role(&self, role_id: RoleId) -> Result<Role> {
        self.directory
            .get_role(role_id)
            .await?
            .ok_or_else(|| GateError::not_found("Role not found"))
    }
}
