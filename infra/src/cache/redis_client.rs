//! Redis client with retry logic
//!
//! Wraps a multiplexed connection and retries transient failures with
//! exponential backoff. Every key passes through the configured prefix.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use ea_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the backoff delay between attempts
const MAX_BACKOFF_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client shared by every cache-backed component
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
}

impl RedisClient {
    /// Connect to Redis, retrying the initial connection
    ///
    /// # Arguments
    /// * `config` - Cache configuration (URL, timeout, retry budget, key prefix)
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Connected client or error
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::connect_with_retry(&client, &config).await?;

        info!("Redis client created successfully");
        Ok(Self { connection, config })
    }

    async fn connect_with_retry(
        client: &Client,
        config: &CacheConfig,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let max_attempts = config.max_retries.max(1);
        let connect_timeout = Duration::from_secs(config.connection_timeout.max(1));
        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Connecting to Redis");

            let outcome = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result.map_err(InfrastructureError::Cache),
                Err(_) => Err(InfrastructureError::Config(format!(
                    "Redis connection timed out after {}s",
                    connect_timeout.as_secs()
                ))),
            };

            match outcome {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_attempts => {
                    warn!(
                        attempt = attempts,
                        max_attempts,
                        retry_in_ms = delay,
                        error = %e,
                        "Failed to connect to Redis, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_BACKOFF_MS);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Giving up connecting to Redis");
                    return Err(e);
                }
            }
        }
    }

    /// Full key for `key` under the configured prefix
    pub fn key(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    /// Set a value with expiration time
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let key = self.key(key);
        let value = value.to_string();

        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            let value = value.clone();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Get a value, `None` when absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key = self.key(key);

        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.key(key);

        let deleted = self
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok(deleted > 0)
    }

    /// Remaining time-to-live in seconds, `None` when the key is absent or persistent
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let key = self.key(key);

        let ttl = self
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok((ttl >= 0).then_some(ttl))
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        if response != "PONG" {
            warn!(response = %response, "Unexpected Redis health check response");
        }
        Ok(response == "PONG")
    }

    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < max_attempts && is_retriable_error(&e) => {
                    warn!(
                        attempt = attempts,
                        max_attempts,
                        retry_in_ms = delay,
                        error = %e,
                        "Redis command failed, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_BACKOFF_MS);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Redis command failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Whether an error is transient and worth retrying
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
