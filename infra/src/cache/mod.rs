//! Cache module for Redis-backed storage
//!
//! Provides the Redis client with retry logic and the revocation store
//! that keeps refresh token ids alive.

pub mod redis_client;
pub mod revocation_store;


pub use redis_client::RedisClient;
pub use revocation_store::RedisRevocationStore;

// Re-export commonly used types
pub use ea_shared::config::CacheConfig;
