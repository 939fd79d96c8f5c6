//! Layered configuration loading
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults, overridden by the plain variables each section reads
//!    (`JWT_SECRET`, `REDIS_URL`, ...)
//! 2. `config.<environment>.toml` in the working directory, if present
//! 3. `APP__`-prefixed variables with `__` as the section separator,
//!    e.g. `APP__JWT__SECRET`

use config::{Config, Environment as EnvSource, File};
use tracing::{debug, info, warn};

use ea_shared::config::{AppConfig, Environment};

use crate::InfrastructureError;

/// Prefix for layered environment overrides
pub const ENV_PREFIX: &str = "APP";

/// Load and validate the application configuration
///
/// Reads a `.env` file first when one exists.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env file");
    }

    let environment = Environment::from_env();
    let config = build_config(environment, Some(environment.config_file()))?;

    info!(environment = %config.environment, "Configuration loaded");
    Ok(config)
}

/// Assemble the layered sources; `file` names an optional TOML file
pub fn build_config(
    environment: Environment,
    file: Option<&str>,
) -> Result<AppConfig, InfrastructureError> {
    let mut defaults = AppConfig::from_env();
    defaults.environment = environment;

    let mut builder = Config::builder().add_source(Config::try_from(&defaults)?);
    if let Some(file) = file {
        builder = builder.add_source(File::with_name(file).required(false));
    }
    let config: AppConfig = builder
        .add_source(
            EnvSource::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    config.validate()?;
    if config.jwt.is_using_default_secret() {
        if config.environment.is_production() {
            return Err(InfrastructureError::Config(
                "jwt.secret must be set in production".to_string(),
            ));
        }
        warn!("Using the built-in development JWT secret");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn jwt_env_is_set() -> bool {
        std::env::var("JWT_SECRET").is_ok() || std::env::var("APP__JWT__SECRET").is_ok()
    }

    #[test]
    fn test_defaults_without_file() {
        let config = build_config(Environment::Development, None).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert!(config.jwt.refresh_token_expiry > config.jwt.access_token_expiry);
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        if jwt_env_is_set() {
            return;
        }
        let path = std::env::temp_dir().join(format!("eduauth-settings-{}.toml", std::process::id()));
        fs::write(
            &path,
            "[jwt]\nsecret = \"file-secret-0123456789abcdef0123456789\"\naccess_token_expiry = 600\n\n[cache]\nkey_prefix = \"eduauth\"\n",
        )
        .unwrap();

        let config = build_config(Environment::Staging, path.to_str());
        fs::remove_file(&path).ok();
        let config = config.unwrap();

        assert_eq!(config.jwt.secret, "file-secret-0123456789abcdef0123456789");
        assert_eq!(config.jwt.access_token_expiry, 600);
        assert_eq!(config.jwt.refresh_token_expiry, 172_800);
        assert_eq!(config.cache.key_prefix.as_deref(), Some("eduauth"));
    }

    #[test]
    fn test_production_requires_real_secret() {
        if jwt_env_is_set() {
            return;
        }

        let result = build_config(Environment::Production, None);

        assert!(matches!(result, Err(InfrastructureError::Config(_))));
    }
}
