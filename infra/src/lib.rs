//! # Infrastructure Layer
//!
//! Concrete implementations behind the EduAuth core:
//! - **Cache**: Redis client with retry and the Redis-backed revocation store
//! - **Settings**: layered configuration loading (`.env`, TOML, environment)
//! - **Telemetry**: tracing subscriber installation
//!
//! ## Features
//!
//! - `redis-cache`: Enable Redis support (default)

use std::sync::Arc;

use ea_core::errors::DomainError;
use ea_core::services::token::{TokenService, TokenServiceConfig};
use ea_shared::config::AppConfig;

/// Cache module - Redis client and revocation store
pub mod cache;

/// Settings module - layered configuration loading
pub mod settings;

/// Telemetry module - tracing subscriber setup
pub mod telemetry;

pub use cache::{RedisClient, RedisRevocationStore};
pub use settings::{build_config, load_config};
pub use telemetry::init_tracing;

/// Token service backed by Redis
pub type RedisTokenService = TokenService<RedisRevocationStore>;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Loaded application configuration
    pub config: AppConfig,
    /// Shared Redis client
    pub redis: RedisClient,
    /// Token service over the Redis revocation store
    pub token_service: Arc<RedisTokenService>,
}

/// Initialize infrastructure services
///
/// This function:
/// - loads configuration
/// - installs the tracing subscriber
/// - connects to Redis
/// - builds the token service
pub async fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    let config = load_config()?;
    init_tracing(&config.logging)?;
    tracing::info!(environment = %config.environment, "Initializing infrastructure services");

    let redis = RedisClient::new(config.cache.clone()).await?;
    let token_service = build_token_service(&config, redis.clone())?;

    tracing::info!("Infrastructure services initialized successfully");
    Ok(InfrastructureServices {
        config,
        redis,
        token_service: Arc::new(token_service),
    })
}

/// Build the token service for an already connected Redis client
pub fn build_token_service(
    config: &AppConfig,
    redis: RedisClient,
) -> Result<RedisTokenService, InfrastructureError> {
    let token_config = TokenServiceConfig::from_jwt_config(&config.jwt)?;
    Ok(TokenService::new(RedisRevocationStore::new(redis), token_config)?)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Settings(#[from] config::ConfigError),

    /// Configuration values failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ea_shared::ConfigError),

    /// Other configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tracing subscriber could not be installed
    #[error("Logging setup error: {0}")]
    Logging(String),

    /// Error raised by the core while wiring services
    #[error(transparent)]
    Domain(#[from] DomainError),
}
