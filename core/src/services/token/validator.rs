//! Checks presented tokens

use std::sync::Arc;
use tracing::{debug, error};

use crate::clock::Clock;
use crate::domain::entities::token::{ClaimSet, TokenKind, VerifiedRefreshToken};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;

/// Validates tokens in a fixed order: structure and signature, expiry,
/// type, then (refresh only) revocation-store liveness
pub struct TokenValidator<S: RevocationStore> {
    codec: Arc<TokenCodec>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: RevocationStore> TokenValidator<S> {
    pub fn new(codec: Arc<TokenCodec>, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { codec, store, clock }
    }

    /// Validates a token of the `expected` kind and returns its claims
    pub async fn parse(&self, token: &str, expected: TokenKind) -> DomainResult<ClaimSet> {
        let claims = self.verify_claims(token, expected)?;
        if expected == TokenKind::Refresh {
            self.check_live(&claims).await?;
        }
        Ok(claims)
    }

    /// Validates an access token; never consults the store
    pub fn parse_access(&self, token: &str) -> DomainResult<ClaimSet> {
        self.verify_claims(token, TokenKind::Access)
    }

    /// Validates a refresh token, including its revocation-store entry
    pub async fn parse_refresh(&self, token: &str) -> DomainResult<VerifiedRefreshToken> {
        let claims = self.verify_claims(token, TokenKind::Refresh)?;
        let token_id = self.check_live(&claims).await?;

        Ok(VerifiedRefreshToken {
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
            subject_id: claims.sub,
            token_id,
        })
    }

    fn verify_claims(&self, token: &str, expected: TokenKind) -> DomainResult<ClaimSet> {
        let claims = self.codec.decode(token).map_err(|e| reject(e, expected))?;

        if claims.is_expired_at(self.clock.now()) {
            return Err(reject(TokenError::Expired, expected));
        }
        if claims.typ != expected {
            return Err(reject(
                TokenError::WrongType {
                    expected,
                    actual: claims.typ,
                },
                expected,
            ));
        }

        Ok(claims)
    }

    async fn check_live(&self, claims: &ClaimSet) -> DomainResult<String> {
        let token_id = match claims.jti.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => return Err(reject(TokenError::missing("jti"), TokenKind::Refresh)),
        };

        let live = self
            .store
            .is_live(token_id, &claims.sub)
            .await
            .map_err(|e| {
                error!(subject_id = %claims.sub, error = %e, "Revocation store lookup failed");
                DomainError::from(e)
            })?;
        if !live {
            return Err(reject(TokenError::Revoked, TokenKind::Refresh));
        }

        Ok(token_id.to_string())
    }
}

fn reject(err: TokenError, expected: TokenKind) -> DomainError {
    debug!(reason = err.code(), expected = %expected, "Rejected token");
    err.into()
}
