//! Redis-backed revocation store
//!
//! Live refresh token ids are stored under `refresh_token:{token_id}` with the
//! subject id as value and the refresh lifetime as Redis expiry. Redis evicts
//! entries on its own once they lapse.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use ea_core::errors::StoreError;
use ea_core::repositories::RevocationStore;

use super::RedisClient;
use crate::InfrastructureError;

/// Key namespace for refresh token entries
const KEY_NAMESPACE: &str = "refresh_token";

/// Revocation store over a shared [`RedisClient`]
#[derive(Clone)]
pub struct RedisRevocationStore {
    client: RedisClient,
}

impl RedisRevocationStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Remaining Redis expiry for a token id, in seconds
    pub async fn remaining_ttl(&self, token_id: &str) -> Result<Option<i64>, StoreError> {
        self.client
            .ttl(&entry_key(token_id))
            .await
            .map_err(to_store_error)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn put(&self, token_id: &str, subject_id: &str, ttl: Duration) -> Result<(), StoreError> {
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        self.client
            .set_with_expiry(&entry_key(token_id), subject_id, seconds)
            .await
            .map_err(to_store_error)?;

        debug!(token_id, ttl_secs = seconds, "Stored refresh token entry");
        Ok(())
    }

    async fn get(&self, token_id: &str) -> Result<Option<String>, StoreError> {
        self.client
            .get(&entry_key(token_id))
            .await
            .map_err(to_store_error)
    }

    async fn delete(&self, token_id: &str) -> Result<bool, StoreError> {
        let removed = self
            .client
            .delete(&entry_key(token_id))
            .await
            .map_err(to_store_error)?;

        debug!(token_id, removed, "Deleted refresh token entry");
        Ok(removed)
    }
}

pub(crate) fn entry_key(token_id: &str) -> String {
    format!("{}:{}", KEY_NAMESPACE, token_id)
}

pub(crate) fn to_store_error(err: InfrastructureError) -> StoreError {
    StoreError::unavailable(err.to_string())
}
