//! Token signing configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// Minimum secret length (bytes) recommended for HS256
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime in seconds (10 years)
pub const MAX_TOKEN_EXPIRY_SECONDS: i64 = 10 * 365 * 24 * 3600;

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric secret used to sign every token
    pub secret: String,

    /// Access token expiry time in seconds
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: default_access_expiry(),
            refresh_token_expiry: default_refresh_expiry(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());
        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_access_expiry);
        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_refresh_expiry);

        Self {
            secret,
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in hours
    pub fn with_refresh_expiry_hours(mut self, hours: i64) -> Self {
        self.refresh_token_expiry = hours * 3600;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    /// Whether the secret is shorter than the HS256 recommendation
    pub fn is_weak_secret(&self) -> bool {
        self.secret.len() < MIN_SECRET_LEN
    }

    /// Check the invariants the token service relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Missing {
                key: "jwt.secret".to_string(),
            });
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::Invalid {
                key: "jwt.access_token_expiry".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.refresh_token_expiry > MAX_TOKEN_EXPIRY_SECONDS {
            return Err(ConfigError::Invalid {
                key: "jwt.refresh_token_expiry".to_string(),
                message: format!("must not exceed {} seconds", MAX_TOKEN_EXPIRY_SECONDS),
            });
        }
        if self.refresh_token_expiry <= self.access_token_expiry {
            return Err(ConfigError::Invalid {
                key: "jwt.refresh_token_expiry".to_string(),
                message: "must be longer than the access token expiry".to_string(),
            });
        }
        Ok(())
    }
}

fn default_access_expiry() -> i64 {
    7200 // 2 hours
}

fn default_refresh_expiry() -> i64 {
    172800 // 48 hours
}
