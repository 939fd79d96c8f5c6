//! Token entities for bearer-token authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::{DomainError, DomainResult};

/// Default access token lifetime (2 hours)
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_HOURS: i64 = 2;

/// Default refresh token lifetime (48 hours)
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS: i64 = 48;

/// Claim names owned by the issuer; extra claims may not reuse them
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "typ", "iat", "exp", "jti"];

/// Which kind of token a claim set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried inside a signed token
///
/// A `ClaimSet` never outlives the request that decoded it; every operation
/// decodes a fresh one from the presented token string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject (principal id)
    pub sub: String,

    /// Token kind tag
    pub typ: TokenKind,

    /// Issued at timestamp (seconds since epoch)
    pub iat: i64,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Unique token id, refresh tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Caller-supplied claims, access tokens only
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClaimSet {
    /// Creates claims for an access token
    ///
    /// Extra claims whose names collide with [`RESERVED_CLAIMS`] are dropped.
    /// Fails if `issued_at + ttl` leaves the representable date range.
    pub fn access(
        subject_id: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        mut extra: Map<String, Value>,
    ) -> DomainResult<Self> {
        extra.retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));

        Ok(Self {
            sub: subject_id.into(),
            typ: TokenKind::Access,
            iat: issued_at.timestamp(),
            exp: expiry(issued_at, ttl)?,
            jti: None,
            extra,
        })
    }

    /// Creates claims for a refresh token
    pub fn refresh(
        subject_id: impl Into<String>,
        token_id: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> DomainResult<Self> {
        Ok(Self {
            sub: subject_id.into(),
            typ: TokenKind::Refresh,
            iat: issued_at.timestamp(),
            exp: expiry(issued_at, ttl)?,
            jti: Some(token_id.into()),
            extra: Map::new(),
        })
    }

    /// Issued-at as a UTC timestamp
    pub fn issued_at(&self) -> DateTime<Utc> {
        timestamp_to_utc(self.iat)
    }

    /// Expiry as a UTC timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        timestamp_to_utc(self.exp)
    }

    /// Checks whether the claims had expired at `now`
    ///
    /// The claims are still valid during the second they expire in. A refresh
    /// token's store entry lapses at the start of that second though, so a
    /// refresh token is only usable while `now < exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp < now.timestamp()
    }

    /// Time left until expiry, negative once expired
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        Duration::seconds(self.exp - now.timestamp())
    }
}

fn expiry(issued_at: DateTime<Utc>, ttl: Duration) -> DomainResult<i64> {
    issued_at
        .checked_add_signed(ttl)
        .map(|at| at.timestamp())
        .ok_or_else(|| DomainError::Internal {
            message: "Token lifetime exceeds the supported date range".to_string(),
        })
}

fn timestamp_to_utc(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A refresh token that passed every validation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRefreshToken {
    pub subject_id: String,
    pub token_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerifiedRefreshToken {
    /// Time left until expiry at `now`
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        Duration::seconds(self.expires_at.timestamp() - now.timestamp())
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token
    pub access_token: String,

    /// Refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in: access_ttl.num_seconds(),
            refresh_expires_in: refresh_ttl.num_seconds(),
        }
    }
}
