//! Core JWT handler implementation

use super::types::{Claims, JwtHandler, TokenResponse};
use crate::config::AuthConfig;
use crate::utils::error::{GateError, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| GateError::internal(format!("System time error: {}", e)))
}

impl JwtHandler {
    /// Create a new JWT handler from injected configuration
    pub fn new(config: &AuthConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(GateError::config("JWT secret cannot be empty"));
        }
        let secret = config.jwt_secret.as_bytes();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiration: config.jwt_expiration,
            issuer: config.issuer.clone(),
        })
    }

    /// Default token lifetime in seconds
    pub fn expiration(&self) -> u64 {
        self.expiration
    }

    /// Sign a token for `subject` valid for `ttl` seconds from now
    pub fn issue(&self, subject: &str, ttl: u64) -> Result<String> {
        self.issue_at(subject, ttl, unix_now()?)
    }

    /// Sign a token as if the current time were `now`
    pub fn issue_at(&self, subject: &str, ttl: u64, now: u64) -> Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
            iss: self.issuer.clone(),
        };

        let header = Header::new(self.algorithm);
        let token = encode(&header, &claims, &self.encoding_key).map_err(GateError::Jwt)?;

        debug!("Issued access token for: {}", subject);
        Ok(token)
    }

    /// Issue a token with the configured lifetime, packaged for the caller
    pub fn create_access_token(&self, subject: &str) -> Result<TokenResponse> {
        Ok(TokenResponse {
            access_token: self.issue(subject, self.expiration)?,
            token_type: "bearer".to_string(),
            expires_in: self.expiration,
        })
    }

    /// Verify signature, issuer and expiry
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.verify_token_at(token, unix_now()?)
    }

    /// Verify as if the current time were `now`.
    ///
    /// Expiry is strict: a token is rejected once `now >= exp`.
    pub fn verify_token_at(&self, token: &str, now: u64) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            warn!("JWT verification failed: {}", e);
            GateError::unauthorized("Could not validate credentials")
        })?;

        if now >= token_data.claims.exp {
            warn!("JWT verification failed: token expired");
            return Err(GateError::unauthorized("Token has expired"));
        }

        debug!("Token verified for: {}", token_data.claims.sub);
        Ok(token_data.claims)
    }
}
