//! In-memory directory
//!
//! Every mutation runs inside one write-lock critical section, so the
//! uniqueness checks here are authoritative rather than advisory.

use super::Directory;
use crate::core::models::{
    AuditEntry, AuditEntryId, NewAuditEntry, NewPermission, NewRole, NewUser, Permission,
    PermissionId, Role, RoleChanges, RoleId, User, UserChanges, UserId,
};
use crate::utils::error::{GateError, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    roles: BTreeMap<RoleId, Role>,
    permissions: BTreeMap<PermissionId, Permission>,
    grants: BTreeSet<(RoleId, PermissionId)>,
    audit: Vec<AuditEntry>,
    next_user_id: UserId,
    next_role_id: RoleId,
    next_permission_id: PermissionId,
    next_audit_id: AuditEntryId,
}

impl State {
    fn with_role_name(&self, user: &User) -> User {
        let mut user = user.clone();
        user.role_name = self.roles.get(&user.role_id).map(|r| r.name.clone());
        user
    }

    fn matches(&self, user: &User, pattern: &str) -> bool {
        let needle = pattern.to_ascii_lowercase();
        let role_name = self
            .roles
            .get(&user.role_id)
            .map(|r| r.name.as_str())
            .unwrap_or_default();

        [user.username.as_str(), user.email.as_str(), role_name]
            .iter()
            .any(|field| field.to_ascii_lowercase().contains(&needle))
    }

    fn sorted_permissions<'a, I>(iter: I) -> Vec<Permission>
    where
        I: Iterator<Item = &'a Permission>,
    {
        let mut permissions: Vec<Permission> = iter.cloned().collect();
        permissions.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        permissions
    }
}

/// Directory backed by process memory.
///
/// Cloning shares the underlying state. Text search is ASCII
/// case-insensitive, matching SQLite's `LIKE`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<State>>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T>(items: Vec<T>, offset: u64, limit: u64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.read();
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .map(|u| state.with_role_name(u)))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read();
        Ok(state
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| state.with_role_name(u)))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        let state = self.state.read();
        Ok(state.users.get(&id).map(|u| state.with_role_name(u)))
    }

    async fn create_user(&self, user: NewUser) -> Result<UserId> {
        let mut state = self.state.write();

        if state.users.values().any(|u| u.username == user.username) {
            return Err(GateError::conflict("Username already registered"));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(GateError::conflict("Email already registered"));
        }
        if !state.roles.contains_key(&user.role_id) {
            return Err(GateError::not_found("Role not found"));
        }

        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.insert(
            id,
            User {
                id,
                username: user.username,
                email: user.email,
                password_hash: user.password_hash,
                role_id: user.role_id,
                role_name: None,
                is_active: user.is_active,
                created_at: Utc::now(),
                last_login: None,
            },
        );

        debug!("Created user {}", id);
        Ok(id)
    }

    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<()> {
        let mut state = self.state.write();

        if !state.users.contains_key(&id) {
            return Err(GateError::not_found("User not found"));
        }
        if let Some(email) = &changes.email {
            if state.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(GateError::conflict("Email already registered"));
            }
        }
        if let Some(role_id) = changes.role_id {
            if !state.roles.contains_key(&role_id) {
                return Err(GateError::not_found("Role not found"));
            }
        }

        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| GateError::not_found("User not found"))?;
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(role_id) = changes.role_id {
            user.role_id = role_id;
        }
        if let Some(active) = changes.is_active {
            user.is_active = active;
        }
        if let Some(at) = changes.last_login {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let mut state = self.state.write();

        if state.users.remove(&id).is_none() {
            return Err(GateError::not_found("User not found"));
        }
        for entry in state.audit.iter_mut().filter(|e| e.user_id == Some(id)) {
            entry.user_id = None;
        }
        Ok(())
    }

    async fn list_users(&self, offset: u64, limit: u64) -> Result<Vec<User>> {
        let state = self.state.read();
        let users = state.users.values().map(|u| state.with_role_name(u)).collect();
        Ok(page(users, offset, limit))
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.state.read().users.len() as u64)
    }

    async fn search_users(&self, pattern: &str, offset: u64, limit: u64) -> Result<Vec<User>> {
        let state = self.state.read();
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| state.matches(u, pattern))
            .map(|u| state.with_role_name(u))
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(page(users, offset, limit))
    }

    async fn count_search(&self, pattern: &str) -> Result<u64> {
        let state = self.state.read();
        Ok(state
            .users
            .values()
            .filter(|u| state.matches(u, pattern))
            .count() as u64)
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        Ok(self.state.read().roles.values().cloned().collect())
    }

    async fn get_role(&self, id: RoleId) -> Result<Option<Role>> {
        Ok(self.state.read().roles.get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        Ok(self
            .state
            .read()
            .roles
            .values()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn create_role(&self, role: NewRole) -> Result<Role> {
        let mut state = self.state.write();

        if state.roles.values().any(|r| r.name == role.name) {
            return Err(GateError::conflict("Role name already exists"));
        }

        state.next_role_id += 1;
        let created = Role {
            id: state.next_role_id,
            name: role.name,
            description: role.description,
            created_at: Utc::now(),
        };
        state.roles.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_role(&self, id: RoleId, changes: RoleChanges) -> Result<Role> {
        let mut state = self.state.write();

        if let Some(name) = &changes.name {
            if state.roles.values().any(|r| r.id != id && &r.name == name) {
                return Err(GateError::conflict("Role name already exists"));
            }
        }

        let role = state
            .roles
            .get_mut(&id)
            .ok_or_else(|| GateError::not_found("Role not found"))?;
        if let Some(name) = changes.name {
            role.name = name;
        }
        if let Some(description) = changes.description {
            role.description = Some(description);
        }
        Ok(role.clone())
    }

    async fn count_users_with_role(&self, role_id: RoleId) -> Result<u64> {
        Ok(self
            .state
            .read()
            .users
            .values()
            .filter(|u| u.role_id == role_id)
            .count() as u64)
    }

    async fn count_roles(&self) -> Result<u64> {
        Ok(self.state.read().roles.len() as u64)
    }

    async fn list_permissions_for_role(&self, role_id: RoleId) -> Result<Vec<Permission>> {
        let state = self.state.read();
        Ok(State::sorted_permissions(
            state
                .grants
                .iter()
                .filter(|(r, _)| *r == role_id)
                .filter_map(|(_, p)| state.permissions.get(p)),
        ))
    }

    async fn list_all_permissions(&self) -> Result<Vec<Permission>> {
        Ok(State::sorted_permissions(
            self.state.read().permissions.values(),
        ))
    }

    async fn create_permission(&self, permission: NewPermission) -> Result<Permission> {
        let mut state = self.state.write();

        if state.permissions.values().any(|p| p.name == permission.name) {
            return Err(GateError::conflict("Permission name already exists"));
        }

        state.next_permission_id += 1;
        let created = Permission {
            id: state.next_permission_id,
            name: permission.name,
            description: permission.description,
            category: permission.category,
        };
        state.permissions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn grant_permission(&self, role_id: RoleId, permission_id: PermissionId) -> Result<()> {
        let mut state = self.state.write();

        if !state.roles.contains_key(&role_id) {
            return Err(GateError::not_found("Role not found"));
        }
        if !state.permissions.contains_key(&permission_id) {
            return Err(GateError::not_found("Permission not found"));
        }
        state.grants.insert((role_id, permission_id));
        Ok(())
    }

    async fn append_audit_entry(&self, entry: NewAuditEntry) -> Result<AuditEntryId> {
        let mut state = self.state.write();

        state.next_audit_id += 1;
        let id = state.next_audit_id;
        state.audit.push(AuditEntry {
            id,
            user_id: entry.user_id,
            username: None,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            details: entry.details,
            ip_address: entry.ip_address,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_recent_audit_entries(&self, limit: u64) -> Result<Vec<AuditEntry>> {
        let state = self.state.read();
        let mut entries: Vec<AuditEntry> = state
            .audit
            .iter()
            .map(|e| {
                let mut entry = e.clone();
                entry.username = e
                    .user_id
                    .and_then(|id| state.users.get(&id))
                    .map(|u| u.username.clone());
                entry
            })
            .collect();
        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}
