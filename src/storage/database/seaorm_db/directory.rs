use crate::core::models::{
    AuditEntry, AuditEntryId, NewAuditEntry, NewPermission, NewRole, NewUser, Permission,
    PermissionId, Role, RoleChanges, RoleId, User, UserChanges, UserId,
};
use crate::storage::Directory;
use crate::utils::error::{GateError, Result};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{
    self, audit_log, permission, role, role_permission, user,
};
use super::types::SeaOrmDirectory;

/// Map a failed user write, naming the unique column that was violated
fn user_write_error(err: DbErr) -> GateError {
    let column = match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => {
            if message.contains("username") {
                Some("Username")
            } else if message.contains("email") {
                Some("Email")
            } else {
                None
            }
        }
        _ => None,
    };

    match column {
        Some(column) => GateError::conflict(format!("{} already registered", column)),
        None => GateError::from_db_write(err, "User"),
    }
}

/// Substring match on username, email or role name.
/// Only valid on queries that join `roles`.
fn search_condition(pattern: &str) -> Condition {
    Condition::any()
        .add(user::Column::Username.contains(pattern))
        .add(user::Column::Email.contains(pattern))
        .add(role::Column::Name.contains(pattern))
}

#[async_trait]
impl Directory for SeaOrmDirectory {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        debug!("Finding user by username: {}", username);

        let row = entities::User::find()
            .filter(user::Column::Username.eq(username))
            .find_also_related(entities::Role)
            .one(&self.db)
            .await?;

        Ok(row.map(|(u, r)| u.to_domain_user(r)))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = entities::User::find()
            .filter(user::Column::Email.eq(email))
            .find_also_related(entities::Role)
            .one(&self.db)
            .await?;

        Ok(row.map(|(u, r)| u.to_domain_user(r)))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row = entities::User::find_by_id(id)
            .find_also_related(entities::Role)
            .one(&self.db)
            .await?;

        Ok(row.map(|(u, r)| u.to_domain_user(r)))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserId> {
        debug!("Creating user: {}", new_user.username);

        let model = user::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role_id: Set(new_user.role_id),
            is_active: Set(new_user.is_active),
            created_at: Set(Utc::now()),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(user_write_error)?;

        Ok(model.id)
    }

    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<()> {
        let model = entities::User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| GateError::not_found("User not found"))?;

        if changes.is_empty() {
            return Ok(());
        }

        let mut active: user::ActiveModel = model.into();
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(hash);
        }
        if let Some(role_id) = changes.role_id {
            active.role_id = Set(role_id);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(at) = changes.last_login {
            active.last_login = Set(Some(at));
        }

        active
            .update(&self.db)
            .await
            .map_err(user_write_error)?;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let result = entities::User::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(GateError::not_found("User not found"));
        }
        Ok(())
    }

    async fn list_users(&self, offset: u64, limit: u64) -> Result<Vec<User>> {
        let rows = entities::User::find()
            .find_also_related(entities::Role)
            .order_by_asc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|(u, r)| u.to_domain_user(r)).collect())
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(entities::User::find().count(&self.db).await?)
    }

    async fn search_users(&self, pattern: &str, offset: u64, limit: u64) -> Result<Vec<User>> {
        debug!("Searching users for: {}", pattern);

        let rows = entities::User::find()
            .find_also_related(entities::Role)
            .filter(search_condition(pattern))
            .order_by_asc(user::Column::Username)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|(u, r)| u.to_domain_user(r)).collect())
    }

    async fn count_search(&self, pattern: &str) -> Result<u64> {
        Ok(entities::User::find()
            .left_join(entities::Role)
            .filter(search_condition(pattern))
            .count(&self.db)
            .await?)
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        let roles = entities::Role::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await?;

        Ok(roles.into_iter().map(Role::from).collect())
    }

    async fn get_role(&self, id: RoleId) -> Result<Option<Role>> {
        let role = entities::Role::find_by_id(id).one(&self.db).await?;
        Ok(role.map(Role::from))
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let role = entities::Role::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(role.map(Role::from))
    }

    async fn create_role(&self, new_role: NewRole) -> Result<Role> {
        debug!("Creating role: {}", new_role.name);

        let model = role::ActiveModel {
            name: Set(new_role.name),
            description: Set(new_role.description),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| GateError::from_db_write(e, "Role name"))?;

        Ok(model.into())
    }

    async fn update_role(&self, id: RoleId, changes: RoleChanges) -> Result<Role> {
        let model = entities::Role::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| GateError::not_found("Role not found"))?;

        if changes.is_empty() {
            return Ok(model.into());
        }

        let mut active: role::ActiveModel = model.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| GateError::from_db_write(e, "Role name"))?;
        Ok(updated.into())
    }

    async fn count_users_with_role(&self, role_id: RoleId) -> Result<u64> {
        Ok(entities::User::find()
            .filter(user::Column::RoleId.eq(role_id))
            .count(&self.db)
            .await?)
    }

    async fn count_roles(&self) -> Result<u64> {
        Ok(entities::Role::find().count(&self.db).await?)
    }

    async fn list_permissions_for_role(&self, role_id: RoleId) -> Result<Vec<Permission>> {
        let permissions = entities::Permission::find()
            .inner_join(entities::RolePermission)
            .filter(role_permission::Column::RoleId.eq(role_id))
            .order_by_asc(permission::Column::Category)
            .order_by_asc(permission::Column::Name)
            .all(&self.db)
            .await?;

        Ok(permissions.into_iter().map(Permission::from).collect())
    }

    async fn list_all_permissions(&self) -> Result<Vec<Permission>> {
        let permissions = entities::Permission::find()
            .order_by_asc(permission::Column::Category)
            .order_by_asc(permission::Column::Name)
            .all(&self.db)
            .await?;

        Ok(permissions.into_iter().map(Permission::from).collect())
    }

    async fn create_permission(&self, new_permission: NewPermission) -> Result<Permission> {
        let model = permission::ActiveModel {
            name: Set(new_permission.name),
            description: Set(new_permission.description),
            category: Set(new_permission.category),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| GateError::from_db_write(e, "Permission name"))?;

        Ok(model.into())
    }

    async fn grant_permission(&self, role_id: RoleId, permission_id: PermissionId) -> Result<()> {
        let grant = role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
        };

        match entities::RolePermission::insert(grant)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Ok(()),
                _ => Err(GateError::from_db_write(e, "Permission grant")),
            },
        }
    }

    async fn append_audit_entry(&self, entry: NewAuditEntry) -> Result<AuditEntryId> {
        let model = audit_log::ActiveModel {
            user_id: Set(entry.user_id),
            action: Set(entry.action),
            entity_type: Set(entry.entity_type),
            entity_id: Set(entry.entity_id),
            details: Set(entry.details),
            ip_address: Set(entry.ip_address),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(model.id)
    }

    async fn list_recent_audit_entries(&self, limit: u64) -> Result<Vec<AuditEntry>> {
        let rows = entities::AuditLog::find()
            .find_also_related(entities::User)
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(entry, actor)| entry.to_domain_entry(actor))
            .collect())
    }
}
