//! Sliding-window refresh token rotation

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::domain::entities::token::VerifiedRefreshToken;
use crate::errors::DomainResult;
use crate::repositories::RevocationStore;

use super::issuer::TokenIssuer;

/// Outcome of the rotation check for a presented refresh token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDecision {
    /// Hand the presented token back unchanged
    Keep,
    /// Replace it with a freshly issued one
    Rotate,
}

/// Rotates a refresh token once at most half of its lifetime remains
#[derive(Debug, Clone, Copy)]
pub struct RotationPolicy {
    refresh_ttl: Duration,
}

impl RotationPolicy {
    pub fn new(refresh_ttl: Duration) -> Self {
        Self { refresh_ttl }
    }

    /// Remaining lifetime at or below which a token is rotated
    pub fn threshold(&self) -> Duration {
        self.refresh_ttl / 2
    }

    pub fn decide(&self, remaining: Duration) -> RotationDecision {
        if remaining > Duration::zero() && remaining <= self.threshold() {
            RotationDecision::Rotate
        } else {
            RotationDecision::Keep
        }
    }

    /// Returns the refresh token the client should hold after this refresh
    ///
    /// Rotation failures never fail the refresh: the presented token is
    /// returned and stays valid.
    pub async fn apply<S: RevocationStore>(
        &self,
        issuer: &TokenIssuer<S>,
        store: &S,
        presented: &VerifiedRefreshToken,
        presented_token: &str,
        now: DateTime<Utc>,
    ) -> String {
        let remaining = presented.remaining_at(now);
        if self.decide(remaining) == RotationDecision::Keep {
            return presented_token.to_string();
        }

        match self.rotate(issuer, store, presented).await {
            Ok(replacement) => {
                info!(
                    subject_id = %presented.subject_id,
                    remaining_secs = remaining.num_seconds(),
                    "Rotated refresh token"
                );
                replacement
            }
            Err(e) => {
                warn!(
                    subject_id = %presented.subject_id,
                    error = %e,
                    "Refresh token rotation failed, keeping presented token"
                );
                presented_token.to_string()
            }
        }
    }

    async fn rotate<S: RevocationStore>(
        &self,
        issuer: &TokenIssuer<S>,
        store: &S,
        presented: &VerifiedRefreshToken,
    ) -> DomainResult<String> {
        let (replacement, replacement_id) =
            issuer.issue_refresh_with_id(&presented.subject_id).await?;

        if let Err(e) = store.delete(&presented.token_id).await {
            // Withdraw the replacement so only the presented token stays live.
            if let Err(withdraw) = store.delete(&replacement_id).await {
                warn!(
                    subject_id = %presented.subject_id,
                    error = %withdraw,
                    "Failed to withdraw unused replacement refresh token"
                );
            }
            return Err(e.into());
        }

        Ok(replacement)
    }
}
