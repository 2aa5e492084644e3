use crate::auth::AuthContext;
use crate::core::models::{AuditEntry, NewAuditEntry};
use crate::storage::Directory;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, error};

/// Audited actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    CreateRole,
    UpdateRole,
    AssignRole,
    CreateUser,
    UpdateUser,
    DeleteUser,
}

impl AuditAction {
    /// Stored action name
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CreateRole => "create_role",
            AuditAction::UpdateRole => "update_role",
            AuditAction::AssignRole => "assign_role",
            AuditAction::CreateUser => "create_user",
            AuditAction::UpdateUser => "update_user",
            AuditAction::DeleteUser => "delete_user",
        }
    }

    /// Type of entity the action targets
    pub fn entity_type(&self) -> &'static str {
        match self {
            AuditAction::CreateRole | AuditAction::UpdateRole => "role",
            AuditAction::AssignRole
            | AuditAction::CreateUser
            | AuditAction::UpdateUser
            | AuditAction::DeleteUser => "user",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit logger over a directory
#[derive(Clone)]
pub struct AuditLogger {
    directory: Arc<dyn Directory>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger").finish_non_exhaustive()
    }
}

impl AuditLogger {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    /// Append one entry. The timestamp is assigned by the directory.
    pub async fn record(&self, entry: NewAuditEntry) {
        let action = entry.action.clone();
        match self.directory.append_audit_entry(entry).await {
            Ok(id) => debug!("Recorded audit entry {} ({})", id, action),
            Err(e) => error!("Failed to record audit entry ({}): {}", action, e),
        }
    }

    /// Record `action` performed by the caller on `entity_id`
    pub async fn record_action(
        &self,
        ctx: &AuthContext,
        action: AuditAction,
        entity_id: Option<i32>,
        details: Option<String>,
    ) {
        self.record(NewAuditEntry {
            user_id: Some(ctx.user_id()),
            action: action.as_str().to_string(),
            entity_type: action.entity_type().to_string(),
            entity_id,
            details,
            ip_address: ctx.origin.clone(),
        })
        .await;
    }

    /// Most recent entries, newest first
    pub async fn recent(&self, limit: u64) -> Result<Vec<AuditEntry>> {
        self.directory.list_recent_audit_entries(limit).await
    }
}
