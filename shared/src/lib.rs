//! Shared configuration and common types for the EduAuth server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types (JWT, cache, environment, logging)
//! - Error response structures and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, Environment, JwtConfig, LogFormat, LoggingConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
