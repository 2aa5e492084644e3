//! Guarded administration
//!
//! Every operation takes the caller's `AuthContext`, checks it against the
//! current role grants, runs the operation and, for mutations, appends an
//! audit entry once it has succeeded.

use crate::audit::{AuditAction, AuditLogger};
use crate::auth::rbac::names;
use crate::auth::{AuthContext, AuthSystem};
use crate::core::models::{
    AuditEntry, CreateUserRequest, Permission, Role, RoleChanges, RoleDetails, RoleId, UserId,
    UserInfo, UserPage, UserUpdate,
};
use crate::utils::error::{GateError, Result};
use std::sync::Arc;
use tracing::debug;

use super::UserService;

/// Permission-checked, audited administration surface
#[derive(Debug, Clone)]
pub struct AdminService {
    auth: Arc<AuthSystem>,
    users: UserService,
    audit: AuditLogger,
}

impl AdminService {
    pub fn new(auth: Arc<AuthSystem>) -> Self {
        let directory = auth.directory().clone();
        Self {
            users: UserService::new(directory.clone(), &auth.config().rbac),
            audit: AuditLogger::new(directory),
            auth,
        }
    }

    pub fn auth(&self) -> &AuthSystem {
        &self.auth
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    // ==================== Roles ====================

    pub async fn list_roles(&self, ctx: &AuthContext) -> Result<Vec<RoleDetails>> {
        self.auth.require_permission(ctx, names::VIEW_ROLES).await?;
        self.auth.rbac().list_roles().await
    }

    pub async fn get_role(&self, ctx: &AuthContext, id: RoleId) -> Result<RoleDetails> {
        self.auth.require_permission(ctx, names::VIEW_ROLES).await?;
        self.auth.rbac().get_role(id).await
    }

    pub async fn roles_count(&self, ctx: &AuthContext) -> Result<u64> {
        self.auth.require_permission(ctx, names::VIEW_ROLES).await?;
        self.auth.rbac().roles_count().await
    }

    pub async fn list_permissions(&self, ctx: &AuthContext) -> Result<Vec<Permission>> {
        self.auth.require_permission(ctx, names::VIEW_ROLES).await?;
        self.auth.rbac().list_permissions().await
    }

    pub async fn create_role(
        &self,
        ctx: &AuthContext,
        name: &str,
        description: Option<String>,
    ) -> Result<Role> {
        self.auth.require_permission(ctx, names::MANAGE_ROLES).await?;

        let role = self.auth.rbac().create_role(name, description).await?;
        self.audit
            .record_action(
                ctx,
                AuditAction::CreateRole,
                Some(role.id),
                Some(format!("Created role: {}", role.name)),
            )
            .await;
        Ok(role)
    }

    pub async fn update_role(
        &self,
        ctx: &AuthContext,
        id: RoleId,
        changes: RoleChanges,
    ) -> Result<Role> {
        self.auth.require_permission(ctx, names::MANAGE_ROLES).await?;

        let details = serde_json::to_string(&changes)?;
        let role = self.auth.rbac().update_role(id, changes).await?;
        self.audit
            .record_action(
                ctx,
                AuditAction::UpdateRole,
                Some(role.id),
                Some(format!("Updated role: {}", details)),
            )
            .await;
        Ok(role)
    }

    /// Move a user to another role. Restricted to administrators.
    pub async fn assign_role(
        &self,
        ctx: &AuthContext,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<()> {
        self.auth.require_admin(ctx).await?;

        self.auth.rbac().assign_role_to_user(user_id, role_id).await?;
        self.audit
            .record_action(
                ctx,
                AuditAction::AssignRole,
                Some(user_id),
                Some(format!("Assigned role {} to user {}", role_id, user_id)),
            )
            .await;
        Ok(())
    }

    // ==================== Users ====================

    pub async fn users_count(&self, ctx: &AuthContext) -> Result<u64> {
        self.auth.require_permission(ctx, names::VIEW_USERS).await?;
        self.auth.rbac().users_count().await
    }

    pub async fn list_users(
        &self,
        ctx: &AuthContext,
        page: u64,
        page_size: u64,
    ) -> Result<UserPage> {
        self.auth.require_permission(ctx, names::VIEW_USERS).await?;
        self.users.list_users(page, page_size).await
    }

    pub async fn search_users(
        &self,
        ctx: &AuthContext,
        query: &str,
        page: u64,
        page_size: u64,
    ) -> Result<UserPage> {
        self.auth.require_permission(ctx, names::VIEW_USERS).await?;
        self.users.search_users(query, page, page_size).await
    }

    pub async fn get_user(&self, ctx: &AuthContext, id: UserId) -> Result<UserInfo> {
        self.auth.require_permission(ctx, names::VIEW_USERS).await?;
        self.users.get_user(id).await
    }

    pub async fn create_user(
        &self,
        ctx: &AuthContext,
        request: CreateUserRequest,
    ) -> Result<UserInfo> {
        self.auth.require_permission(ctx, names::CREATE_USER).await?;

        let user = self.users.create_user(request).await?;
        self.audit
            .record_action(
                ctx,
                AuditAction::CreateUser,
                Some(user.id),
                Some(format!("Created user: {}", user.username)),
            )
            .await;
        Ok(user)
    }

    pub async fn update_user(
        &self,
        ctx: &AuthContext,
        id: UserId,
        update: UserUpdate,
    ) -> Result<UserInfo> {
        self.auth.require_permission(ctx, names::UPDATE_USER).await?;

        let fields = changed_fields(&update);
        let user = self.users.update_user(id, update).await?;
        self.audit
            .record_action(
                ctx,
                AuditAction::UpdateUser,
                Some(user.id),
                Some(format!("Updated user {}: {}", user.username, fields.join(", "))),
            )
            .await;
        Ok(user)
    }

    pub async fn delete_user(&self, ctx: &AuthContext, id: UserId) -> Result<()> {
        self.auth.require_permission(ctx, names::DELETE_USER).await?;

        self.users.delete_user(ctx.user_id(), id).await?;
        self.audit
            .record_action(
                ctx,
                AuditAction::DeleteUser,
                Some(id),
                Some(format!("Deleted user {}", id)),
            )
            .await;
        Ok(())
    }

    // ==================== Audit ====================

    pub async fn recent_audit(&self, ctx: &AuthContext, limit: u64) -> Result<Vec<AuditEntry>> {
        self.auth.require_permission(ctx, names::VIEW_AUDIT_LOGS).await?;
        self.audit.recent(limit).await
    }

    /// Confirm the caller is an administrator
    pub async fn verify_admin(&self, ctx: &AuthContext) -> Result<()> {
        if self.auth.is_admin(ctx.user_id()).await? {
            debug!("Verified admin {}", ctx.username());
            return Ok(());
        }
        Err(GateError::forbidden("User is not an administrator"))
    }
}

/// Names of the fields an update touches. The password value never appears.
fn changed_fields(update: &UserUpdate) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if update.email.is_some() {
        fields.push("email");
    }
    if update.password.is_some() {
        fields.push("password");
    }
    if update.role_id.is_some() {
        fields.push("role_id");
    }
    if update.is_active.is_some() {
        fields.push("is_active");
    }
    fields
}
