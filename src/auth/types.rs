//! Authentication types

use crate::core::models::{UserId, UserInfo};
use serde::{Deserialize, Serialize};

/// A verified identity for the duration of one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// The authenticated user as loaded when the token was resolved
    pub user: UserInfo,
    /// Client address, when the transport knows it
    pub origin: Option<String>,
}

impl AuthContext {
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}
