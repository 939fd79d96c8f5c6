//! Mints access and refresh tokens

use chrono::Duration;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::entities::token::{ClaimSet, RESERVED_CLAIMS};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;

/// Issues signed tokens and registers refresh token ids
pub struct TokenIssuer<S: RevocationStore> {
    codec: Arc<TokenCodec>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<S: RevocationStore> TokenIssuer<S> {
    pub fn new(
        codec: Arc<TokenCodec>,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            store,
            clock,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issues an access token carrying `extra` claims
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Principal the token is issued to, must be non-empty
    /// * `extra` - Additional claims; names reserved by the issuer are dropped
    ///
    /// # Returns
    ///
    /// The signed token string
    pub fn issue_access(&self, subject_id: &str, extra: Map<String, Value>) -> DomainResult<String> {
        ensure_subject(subject_id)?;

        let dropped: Vec<&str> = extra
            .keys()
            .map(String::as_str)
            .filter(|key| RESERVED_CLAIMS.contains(key))
            .collect();
        if !dropped.is_empty() {
            warn!(subject_id, dropped = ?dropped, "Ignoring extra claims with reserved names");
        }

        let claims = ClaimSet::access(subject_id, self.clock.now(), self.access_ttl, extra)?;
        let token = self.codec.encode(&claims)?;

        debug!(subject_id, exp = claims.exp, "Issued access token");
        Ok(token)
    }

    /// Issues a refresh token and records its id in the revocation store
    ///
    /// The token is only returned once the store write has succeeded.
    pub async fn issue_refresh(&self, subject_id: &str) -> DomainResult<String> {
        self.issue_refresh_with_id(subject_id)
            .await
            .map(|(token, _)| token)
    }

    /// Like [`issue_refresh`](Self::issue_refresh) but also returns the token id
    pub(crate) async fn issue_refresh_with_id(
        &self,
        subject_id: &str,
    ) -> DomainResult<(String, String)> {
        ensure_subject(subject_id)?;

        let token_id = Uuid::new_v4().to_string();
        let claims = ClaimSet::refresh(subject_id, &token_id, self.clock.now(), self.refresh_ttl)?;
        let token = self.codec.encode(&claims)?;

        let ttl = self.refresh_ttl.to_std().map_err(|_| DomainError::Internal {
            message: "Refresh token lifetime must be positive".to_string(),
        })?;
        self.store
            .put(&token_id, subject_id, ttl)
            .await
            .map_err(|e| {
                error!(subject_id, error = %e, "Failed to register refresh token");
                DomainError::from(e)
            })?;

        debug!(subject_id, token_id = %token_id, exp = claims.exp, "Issued refresh token");
        Ok((token, token_id))
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

fn ensure_subject(subject_id: &str) -> DomainResult<()> {
    if subject_id.trim().is_empty() {
        return Err(DomainError::Validation {
            message: "Subject id must not be empty".to_string(),
        });
    }
    Ok(())
}
