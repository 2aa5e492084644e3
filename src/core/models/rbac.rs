//! Role and permission models

use super::{PermissionId, RoleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named bucket of granted permissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    /// Role name (unique)
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A role together with its grants and member count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDetails {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
    /// Users currently assigned to the role
    pub user_count: u64,
}

impl RoleDetails {
    pub fn permission_names(&self) -> Vec<&str> {
        self.permissions.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    /// Permission name (unique)
    pub name: String,
    pub description: Option<String>,
    /// Display grouping only, never consulted by checks
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update of a role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RoleChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewPermission {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
}
