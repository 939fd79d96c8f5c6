//! Configuration for the token service

use chrono::Duration;
use ea_shared::config::auth::MAX_TOKEN_EXPIRY_SECONDS;
use ea_shared::config::JwtConfig;
use std::fmt;

use crate::domain::entities::token::{
    DEFAULT_ACCESS_TOKEN_EXPIRY_HOURS, DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS,
};
use crate::errors::DomainResult;

/// Configuration for the token service
///
/// Built once at start-up and handed to [`TokenService`](super::TokenService).
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// Symmetric signing secret
    pub jwt_secret: String,
    /// Access token expiry in seconds
    pub access_token_expiry_seconds: i64,
    /// Refresh token expiry in seconds
    pub refresh_token_expiry_seconds: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            access_token_expiry_seconds: DEFAULT_ACCESS_TOKEN_EXPIRY_HOURS * 3600,
            refresh_token_expiry_seconds: DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS * 3600,
        }
    }
}

impl TokenServiceConfig {
    /// Create a configuration with the given secret and default lifetimes
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Build from the shared JWT configuration, validating it
    pub fn from_jwt_config(jwt: &JwtConfig) -> DomainResult<Self> {
        jwt.validate()?;
        Ok(Self {
            jwt_secret: jwt.secret.clone(),
            access_token_expiry_seconds: jwt.access_token_expiry,
            refresh_token_expiry_seconds: jwt.refresh_token_expiry,
        })
    }

    /// Check secret presence and lifetime ordering
    pub fn validate(&self) -> DomainResult<()> {
        self.as_jwt_config().validate()?;
        Ok(())
    }

    /// Whether the secret is shorter than recommended for HS256
    pub fn is_weak_secret(&self) -> bool {
        self.as_jwt_config().is_weak_secret()
    }

    /// Access lifetime, saturating at the largest lifetime `validate` accepts
    pub fn access_ttl(&self) -> Duration {
        bounded_ttl(self.access_token_expiry_seconds)
    }

    /// Refresh lifetime, saturating like [`access_ttl`](Self::access_ttl)
    pub fn refresh_ttl(&self) -> Duration {
        bounded_ttl(self.refresh_token_expiry_seconds)
    }

    fn as_jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            access_token_expiry: self.access_token_expiry_seconds,
            refresh_token_expiry: self.refresh_token_expiry_seconds,
        }
    }
}

fn bounded_ttl(seconds: i64) -> Duration {
    Duration::seconds(seconds.clamp(0, MAX_TOKEN_EXPIRY_SECONDS))
}

impl fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_expiry_seconds", &self.access_token_expiry_seconds)
            .field("refresh_token_expiry_seconds", &self.refresh_token_expiry_seconds)
            .finish()
    }
}
