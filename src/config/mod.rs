//! Configuration management
//!
//! Configuration is loaded once at startup (from YAML or the environment) and
//! then handed to each component explicitly; nothing reads it from global state.

pub mod models;

pub use models::*;

use crate::utils::error::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Authentication configuration
    #[serde(default = "AuthConfig::without_secret")]
    pub auth: AuthConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GateError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build from defaults plus the variables `lookup` returns.
    ///
    /// No signing secret is generated: `RBAC_GATE_JWT_SECRET` must be present.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            auth: AuthConfig::without_secret(),
            ..Self::default()
        };
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document without validating it
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| GateError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Apply overrides using `lookup` to read variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("RBAC_GATE_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(expiration) = lookup("RBAC_GATE_JWT_EXPIRATION") {
            self.auth.jwt_expiration = expiration
                .parse()
                .map_err(|e| GateError::Config(format!("Invalid JWT expiration: {}", e)))?;
        }
        if let Some(issuer) = lookup("RBAC_GATE_JWT_ISSUER") {
            self.auth.issuer = issuer;
        }
        if let Some(role) = lookup("RBAC_GATE_DEFAULT_ROLE") {
            self.auth.rbac.default_role = role;
        }
        if let Some(username) = lookup("RBAC_GATE_ADMIN_USERNAME") {
            self.auth.bootstrap.username = username;
        }
        if let Some(email) = lookup("RBAC_GATE_ADMIN_EMAIL") {
            self.auth.bootstrap.email = email;
        }
        if let Some(password) = lookup("RBAC_GATE_ADMIN_PASSWORD") {
            self.auth.bootstrap.password = password;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database.url = url;
        }
        if let Some(max_conn) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.storage.database.max_connections = max_conn
                .parse()
                .map_err(|e| GateError::Config(format!("Invalid max connections: {}", e)))?;
        }

        if let Some(level) = lookup("RBAC_GATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("RBAC_GATE_LOG_JSON") {
            self.logging.json = json
                .parse()
                .map_err(|e| GateError::Config(format!("Invalid log json flag: {}", e)))?;
        }

        Ok(())
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.auth.validate().map_err(GateError::Config)?;
        self.storage.database.validate().map_err(GateError::Config)?;
        Ok(())
    }
}
