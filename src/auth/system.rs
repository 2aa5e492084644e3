//! Core authentication system implementation

use super::jwt::{JwtHandler, TokenResponse};
use super::rbac::RbacSystem;
use super::types::AuthContext;
use crate::config::AuthConfig;
use crate::core::models::{NewUser, User, UserChanges, UserId, UserInfo};
use crate::storage::Directory;
use crate::utils::crypto::{hash_password, verify_dummy_password, verify_password};
use crate::utils::error::{GateError, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main authentication system
#[derive(Clone)]
pub struct AuthSystem {
    /// Authentication configuration
    config: Arc<AuthConfig>,
    /// Backing directory
    directory: Arc<dyn Directory>,
    /// JWT handler
    jwt: Arc<JwtHandler>,
    /// RBAC engine
    rbac: Arc<RbacSystem>,
}

impl std::fmt::Debug for AuthSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSystem")
            .field("config", &self.config)
            .field("jwt", &self.jwt)
            .field("rbac", &self.rbac)
            .finish_non_exhaustive()
    }
}

impl AuthSystem {
    /// Create a new authentication system
    pub fn new(config: &AuthConfig, directory: Arc<dyn Directory>) -> Result<Self> {
        info!("Initializing authentication system");

        let jwt = Arc::new(JwtHandler::new(config)?);
        let rbac = Arc::new(RbacSystem::new(&config.rbac, directory.clone()));

        Ok(Self {
            config: Arc::new(config.clone()),
            directory,
            jwt,
            rbac,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    pub fn jwt(&self) -> &JwtHandler {
        &self.jwt
    }

    pub fn rbac(&self) -> &RbacSystem {
        &self.rbac
    }

    /// Register a new account with the default role.
    ///
    /// Username uniqueness is checked before email uniqueness; the email
    /// check is never reached when the username is taken.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserInfo> {
        if self.directory.find_user_by_username(username).await?.is_some() {
            return Err(GateError::conflict("Username already registered"));
        }
        if self.directory.find_user_by_email(email).await?.is_some() {
            return Err(GateError::conflict("Email already registered"));
        }

        let role = self
            .directory
            .find_role_by_name(&self.config.rbac.default_role)
            .await?
            .ok_or_else(|| GateError::not_found("Role not found"))?;

        let id = self
            .directory
            .create_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: hash_password(password)?,
                role_id: role.id,
                is_active: true,
            })
            .await?;

        info!("Registered user '{}' ({})", username, id);
        self.load_user(id).await
    }

    /// Check credentials.
    ///
    /// Unknown user, wrong password and inactive account all yield `None`,
    /// and all three pay for one Argon2 verification.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.directory.find_user_by_username(username).await? else {
            verify_dummy_password(password);
            debug!("Authentication failed: unknown user");
            return Ok(None);
        };

        if !verify_password(password, &user.password_hash) {
            debug!("Authentication failed: bad password for user {}", user.id);
            return Ok(None);
        }

        if !user.is_active {
            debug!("Authentication failed: user {} is inactive", user.id);
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let Some(user) = self.authenticate(username, password).await? else {
            warn!("Rejected login attempt");
            return Err(GateError::unauthorized("Incorrect username or password"));
        };

        self.directory
            .update_user(
                user.id,
                UserChanges {
                    last_login: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;

        info!("User '{}' logged in", user.username);
        self.jwt.create_access_token(&user.username)
    }

    /// Resolve a bearer token to the current identity.
    ///
    /// The user must still exist and be active.
    pub async fn resolve(&self, token: &str, origin: Option<String>) -> Result<AuthContext> {
        let claims = self.jwt.verify_token(token)?;

        let user = self
            .directory
            .find_user_by_username(&claims.sub)
            .await?
            .ok_or_else(|| {
                warn!("Token subject no longer exists");
                GateError::unauthorized("Could not validate credentials")
            })?;

        if !user.is_active {
            warn!("Token presented for inactive user {}", user.id);
            return Err(GateError::unauthorized("Inactive user"));
        }

        Ok(AuthContext {
            user: user.into(),
            origin,
        })
    }

    /// Whether the user's role is the admin role
    pub async fn is_admin(&self, user_id: UserId) -> Result<bool> {
        self.rbac.is_admin(user_id).await
    }

    /// Fail with `Forbidden` unless the caller's current role grants `permission`
    pub async fn require_permission(&self, ctx: &AuthContext, permission: &str) -> Result<()> {
        if self.rbac.check_permission(ctx.user_id(), permission).await? {
            return Ok(());
        }
        warn!(
            "User {} denied: missing permission '{}'",
            ctx.user_id(),
            permission
        );
        Err(GateError::forbidden("Not enough permissions"))
    }

    /// Fail with `Forbidden` unless the caller's current role is `role`
    pub async fn require_role(&self, ctx: &AuthContext, role: &str) -> Result<()> {
        let current = self.rbac.get_user_role_name(ctx.user_id()).await?;
        if current.as_deref() == Some(role) {
            return Ok(());
        }
        warn!("User {} denied: role '{}' required", ctx.user_id(), role);
        Err(GateError::forbidden(format!("Role '{}' required", role)))
    }

    /// Fail with `Forbidden` unless the caller holds the admin role
    pub async fn require_admin(&self, ctx: &AuthContext) -> Result<()> {
        let admin_role = self.config.rbac.admin_role.clone();
        self.require_role(ctx, &admin_role).await
    }

    async fn load_user(&self, id: UserId) -> Result<UserInfo> {
        self.directory
            .find_user_by_id(id)
            .await?
            .map(UserInfo::from)
            .ok_or_else(|| GateError::not_found("User not found"))
    }
}
