//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing secret and token lifetimes
//! - `cache` - Redis connection used by the revocation store
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod cache;
pub mod environment;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Errors raised while validating configuration values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration value: {key}")]
    Missing { key: String },

    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Redis configuration for the revocation store
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            jwt: JwtConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            jwt: JwtConfig::from_env(),
            cache: CacheConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Validate every section that has invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_app_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.logging.level, "ea_core=debug,ea_infra=debug,info");
    }

    #[test]
    fn test_app_config_deserializes_with_missing_sections() {
        let config: AppConfig = serde_json::from_str(r#"{"jwt": {"secret": "abc"}}"#).unwrap();
        assert_eq!(config.jwt.secret, "abc");
        assert_eq!(config.jwt.access_token_expiry, 7200);
        assert_eq!(config.cache.url, "redis://localhost:6379");
    }
}
