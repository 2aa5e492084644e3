//! Authentication configuration

use super::*;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret. Loaded configurations must set it explicitly so
    /// that every process sharing a directory verifies the same tokens.
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,
    /// Issuer claim stamped on and required of every token
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// RBAC configuration
    #[serde(default)]
    pub rbac: RbacConfig,
    /// Account created on first initialization
    #[serde(default)]
    pub bootstrap: BootstrapAdminConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generate_secure_jwt_secret(),
            jwt_expiration: default_jwt_expiration(),
            issuer: default_issuer(),
            rbac: RbacConfig::default(),
            bootstrap: BootstrapAdminConfig::default(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration", &self.jwt_expiration)
            .field("issuer", &self.issuer)
            .field("rbac", &self.rbac)
            .field("bootstrap", &self.bootstrap)
            .finish()
    }
}

impl AuthConfig {
    /// Defaults with no signing secret, the starting point for loaded configurations
    pub fn without_secret() -> Self {
        Self {
            jwt_secret: String::new(),
            ..Self::default()
        }
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.is_empty() {
            return Err(
                "JWT secret is not configured; set auth.jwt_secret or RBAC_GATE_JWT_SECRET"
                    .to_string(),
            );
        }

        if self.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long for security".to_string());
        }

        if self.jwt_secret.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(
                "JWT secret should contain mixed case letters, numbers, and special characters"
                    .to_string(),
            );
        }

        if self.jwt_expiration < 300 {
            return Err("JWT expiration should be at least 5 minutes (300 seconds)".to_string());
        }

        if self.jwt_expiration > 86400 * 30 {
            return Err(
                "JWT expiration should not exceed 30 days for security reasons".to_string(),
            );
        }

        if self.issuer.is_empty() {
            return Err("JWT issuer cannot be empty".to_string());
        }

        self.rbac.validate()?;
        self.bootstrap.validate()
    }
}

/// RBAC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Role given to newly registered users
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Role that holds every permission
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            default_role: default_role(),
            admin_role: default_admin_role(),
        }
    }
}

impl RbacConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_role.is_empty() || self.admin_role.is_empty() {
            return Err("RBAC role names cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Bootstrap administrator account
#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapAdminConfig {
    #[serde(default = "default_bootstrap_username")]
    pub username: String,
    #[serde(default = "default_bootstrap_email")]
    pub email: String,
    #[serde(default = "default_bootstrap_password")]
    pub password: String,
}

impl Default for BootstrapAdminConfig {
    fn default() -> Self {
        Self {
            username: default_bootstrap_username(),
            email: default_bootstrap_email(),
            password: default_bootstrap_password(),
        }
    }
}

impl std::fmt::Debug for BootstrapAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdminConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl BootstrapAdminConfig {
    fn validate(&self) -> Result<(), String> {
        if self.username.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err("Bootstrap admin username, email and password are required".to_string());
        }
        Ok(())
    }
}

fn default_bootstrap_username() -> String {
    "admin".to_string()
}

fn default_bootstrap_email() -> String {
    "admin@example.com".to_string()
}

fn default_bootstrap_password() -> String {
    "admin123".to_string()
}

/// Generate a secure random JWT secret
pub fn generate_secure_jwt_secret() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
