//! Revocation store trait defining the liveness authority for refresh tokens.

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::StoreError;

/// Key-value store that decides whether a refresh token is still live
///
/// Each refresh token id maps to the subject it was issued for. The entry
/// lives for the refresh-token lifetime and its presence is the only thing
/// that keeps a refresh token usable: once it expires or is deleted the token
/// is rejected even though its signature still verifies.
///
/// Every method is a single atomic operation on the backing store; callers
/// never rely on multi-key transactions.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Register `token_id -> subject_id` for `ttl`
    ///
    /// # Arguments
    /// * `token_id` - The refresh token's unique id
    /// * `subject_id` - The principal the token was issued to
    /// * `ttl` - How long the entry stays live
    ///
    /// # Returns
    /// * `Ok(())` - Entry written
    /// * `Err(StoreError)` - The store could not be reached
    async fn put(&self, token_id: &str, subject_id: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Look up the subject registered for `token_id`
    ///
    /// # Returns
    /// * `Ok(Some(subject_id))` - Entry is live
    /// * `Ok(None)` - Entry expired or was deleted
    /// * `Err(StoreError)` - The store could not be reached
    async fn get(&self, token_id: &str) -> Result<Option<String>, StoreError>;

    /// Delete the entry for `token_id`
    ///
    /// # Returns
    /// * `Ok(true)` - An entry was removed
    /// * `Ok(false)` - Nothing was stored under that id
    /// * `Err(StoreError)` - The store could not be reached
    async fn delete(&self, token_id: &str) -> Result<bool, StoreError>;

    /// Check that `token_id` is live and bound to `subject_id`
    async fn is_live(&self, token_id: &str, subject_id: &str) -> Result<bool, StoreError> {
        Ok(self.get(token_id).await?.as_deref() == Some(subject_id))
    }
}
