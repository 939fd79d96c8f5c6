//! Error types for token handling and the revocation store
//!
//! `TokenError` keeps the exact reason a bearer token was rejected so it can
//! be logged; callers at the system boundary collapse every variant into a
//! single Unauthorized answer.

use thiserror::Error;

use crate::domain::entities::token::TokenKind;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("No token presented")]
    EmptyToken,

    #[error("Malformed token: {reason}")]
    Malformed { reason: String },

    #[error("Invalid signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Wrong token type: expected {expected}, got {actual}")]
    WrongType { expected: TokenKind, actual: TokenKind },

    #[error("Missing claim: {claim}")]
    MissingClaim { claim: String },

    #[error("Token revoked")]
    Revoked,
}

impl TokenError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TokenError::Malformed {
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(claim: impl Into<String>) -> Self {
        TokenError::MissingClaim {
            claim: claim.into(),
        }
    }

    /// Stable identifier for logs and metrics
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::EmptyToken => "EMPTY_TOKEN",
            TokenError::Malformed { .. } => "MALFORMED",
            TokenError::BadSignature => "BAD_SIGNATURE",
            TokenError::Expired => "EXPIRED",
            TokenError::WrongType { .. } => "WRONG_TYPE",
            TokenError::MissingClaim { .. } => "MISSING_CLAIM",
            TokenError::Revoked => "REVOKED",
        }
    }
}

/// Revocation store failures
///
/// These are transport problems, never a statement about a token's validity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Revocation store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }
}
