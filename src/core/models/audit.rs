//! Audit trail models

use super::{AuditEntryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of a privileged action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    /// Acting user; `None` for system actions or after the actor was deleted
    pub user_id: Option<UserId>,
    /// Actor's username, resolved at read time
    pub username: Option<String>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Entry to append; the directory assigns id and timestamp
#[derive(Debug, Clone, Default)]
pub struct NewAuditEntry {
    pub user_id: Option<UserId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}
