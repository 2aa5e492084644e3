//! User models

use super::{RoleId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored user account
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Username (unique, case-sensitive)
    pub username: String,
    /// Email address (unique, case-sensitive)
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: RoleId,
    /// Name of the referenced role, when the directory resolved it
    pub role_name: Option<String>,
    /// Inactive accounts cannot authenticate
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("role_id", &self.role_id)
            .field("role_name", &self.role_name)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// Public view of a user, safe to return to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role_id: RoleId,
    pub role_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role_id: user.role_id,
            role_name: user.role_name,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

/// Fields needed to insert a user
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: RoleId,
    pub is_active: bool,
}

/// Partial update of a user; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role_id: Option<RoleId>,
    pub is_active: Option<bool>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password_hash.is_none()
            && self.role_id.is_none()
            && self.is_active.is_none()
            && self.last_login.is_none()
    }
}

/// Caller-facing partial update; the password is hashed before it reaches storage
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub role_id: Option<RoleId>,
    pub is_active: Option<bool>,
}

impl std::fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpdate")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role_id", &self.role_id)
            .field("is_active", &self.is_active)
            .finish()
    }
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.role_id.is_none()
            && self.is_active.is_none()
    }
}

/// One page of a user listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<UserInfo>,
    /// Total matching users across all pages
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Administrative account creation request
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Defaults to the configured default role
    pub role_id: Option<RoleId>,
    /// Defaults to active
    pub is_active: Option<bool>,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role_id", &self.role_id)
            .field("is_active", &self.is_active)
            .finish()
    }
}
