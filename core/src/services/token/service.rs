//! Token service facade

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::domain::entities::token::{ClaimSet, TokenKind, TokenPair, VerifiedRefreshToken};
use crate::errors::{DomainResult, TokenError};
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;
use super::rotation::RotationPolicy;
use super::signer::Signer;
use super::validator::TokenValidator;

const BEARER_SCHEME: &str = "bearer";

/// Service for issuing, validating, rotating and revoking bearer tokens
///
/// Holds no per-request state; share one instance behind an `Arc`.
pub struct TokenService<S: RevocationStore> {
    store: Arc<S>,
    codec: Arc<TokenCodec>,
    issuer: TokenIssuer<S>,
    validator: TokenValidator<S>,
    rotation: RotationPolicy,
    clock: Arc<dyn Clock>,
    config: TokenServiceConfig,
}

impl<S: RevocationStore> TokenService<S> {
    /// Creates a new token service reading wall-clock time
    ///
    /// # Arguments
    ///
    /// * `store` - Revocation store holding live refresh token ids
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or a validation error for a bad configuration
    pub fn new(store: S, config: TokenServiceConfig) -> DomainResult<Self> {
        Self::with_clock(Arc::new(store), config, Arc::new(SystemClock))
    }

    /// Creates a new token service with an explicit store handle and clock
    pub fn with_clock(
        store: Arc<S>,
        config: TokenServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> DomainResult<Self> {
        config.validate()?;
        if config.is_weak_secret() {
            warn!("Token signing secret is shorter than recommended for HS256");
        }

        let codec = Arc::new(TokenCodec::new(Signer::new(config.jwt_secret.as_bytes()))?);
        let issuer = TokenIssuer::new(
            codec.clone(),
            store.clone(),
            clock.clone(),
            config.access_ttl(),
            config.refresh_ttl(),
        );
        let validator = TokenValidator::new(codec.clone(), store.clone(), clock.clone());
        let rotation = RotationPolicy::new(config.refresh_ttl());

        Ok(Self {
            store,
            codec,
            issuer,
            validator,
            rotation,
            clock,
            config,
        })
    }

    /// Issues an access token for `subject_id`
    pub fn issue_access_token(
        &self,
        subject_id: &str,
        extra: Map<String, Value>,
    ) -> DomainResult<String> {
        self.issuer.issue_access(subject_id, extra)
    }

    /// Issues a refresh token for `subject_id` and registers it
    pub async fn issue_refresh_token(&self, subject_id: &str) -> DomainResult<String> {
        self.issuer.issue_refresh(subject_id).await
    }

    /// Issues a fresh access and refresh token, e.g. after login
    pub async fn issue_token_pair(
        &self,
        subject_id: &str,
        extra: Map<String, Value>,
    ) -> DomainResult<TokenPair> {
        let access_token = self.issuer.issue_access(subject_id, extra)?;
        let refresh_token = self.issuer.issue_refresh(subject_id).await?;

        info!(subject_id, "Issued token pair");
        Ok(self.pair(access_token, refresh_token))
    }

    /// Validates an access token and returns its subject id
    pub fn parse_access_token(&self, token: &str) -> DomainResult<String> {
        self.validator.parse_access(token).map(|claims| claims.sub)
    }

    /// Validates an access token and returns all of its claims
    pub fn parse_access_claims(&self, token: &str) -> DomainResult<ClaimSet> {
        self.validator.parse_access(token)
    }

    /// Validates a refresh token and returns its subject id
    pub async fn parse_refresh_token(&self, token: &str) -> DomainResult<String> {
        self.validator
            .parse_refresh(token)
            .await
            .map(|verified| verified.subject_id)
    }

    /// Validates a refresh token and returns its verified identity
    pub async fn verify_refresh_token(&self, token: &str) -> DomainResult<VerifiedRefreshToken> {
        self.validator.parse_refresh(token).await
    }

    /// Validates a token of either kind
    pub async fn parse_token(&self, token: &str, expected: TokenKind) -> DomainResult<ClaimSet> {
        self.validator.parse(token, expected).await
    }

    /// Exchanges a refresh token for a new token pair
    ///
    /// The refresh token in the returned pair is either the presented one or,
    /// once at most half of its lifetime remains, a replacement.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - Refresh token presented by the client
    /// * `extra` - Extra claims for the new access token
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New access token plus the refresh token to keep
    /// * `Err(DomainError)` - The refresh token failed validation
    pub async fn refresh_token_pair(
        &self,
        refresh_token: &str,
        extra: Map<String, Value>,
    ) -> DomainResult<TokenPair> {
        let presented = self.validator.parse_refresh(refresh_token).await?;
        let access_token = self.issuer.issue_access(&presented.subject_id, extra)?;
        let refresh_token = self
            .rotation
            .apply(
                &self.issuer,
                self.store.as_ref(),
                &presented,
                refresh_token,
                self.clock.now(),
            )
            .await;

        debug!(subject_id = %presented.subject_id, "Refreshed token pair");
        Ok(self.pair(access_token, refresh_token))
    }

    /// Revokes a refresh token, e.g. on logout
    ///
    /// Tokens that fail to decode, or that carry no token id, have nothing to
    /// revoke and succeed without touching the store. Revoking twice is fine.
    pub async fn invalidate_refresh_token(&self, refresh_token: &str) -> DomainResult<()> {
        let claims = match self.codec.decode(refresh_token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(reason = e.code(), "Nothing to revoke for undecodable token");
                return Ok(());
            }
        };

        let token_id = match claims.jti.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => {
                debug!(subject_id = %claims.sub, "Nothing to revoke for token without id");
                return Ok(());
            }
        };

        let removed = self.store.delete(token_id).await?;
        info!(subject_id = %claims.sub, removed, "Refresh token invalidated");
        Ok(())
    }

    /// Gets the service configuration
    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    fn pair(&self, access_token: String, refresh_token: String) -> TokenPair {
        TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_ttl(),
            self.config.refresh_ttl(),
        )
    }
}

/// Extracts the token from an `Authorization` header value
///
/// The scheme is matched case-insensitively.
///
/// # Returns
///
/// * `Ok(&str)` - The bearer token
/// * `Err(TokenError::EmptyToken)` - Header missing, blank, or without a token
/// * `Err(TokenError::Malformed)` - Any scheme other than `Bearer`
pub fn extract_bearer_token(header_value: Option<&str>) -> Result<&str, TokenError> {
    let value = header_value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(TokenError::EmptyToken);
    }

    let (scheme, token) = value.split_once(char::is_whitespace).unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(TokenError::malformed("unsupported authorization scheme"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::EmptyToken);
    }
    Ok(token)
}
