//! Domain-specific error types and error handling.

mod types;


pub use types::{StoreError, TokenError};

use ea_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use ea_shared::ConfigError;
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether this error belongs to the Unauthorized family
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DomainError::Token(_))
    }

    /// The token failure kind, if this is a token rejection
    pub fn token_error(&self) -> Option<&TokenError> {
        match self {
            DomainError::Token(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status the boundary layer should answer with
    ///
    /// Every token rejection collapses to 401 regardless of its kind.
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Token(_) => 401,
            DomainError::Validation { .. } => 400,
            DomainError::Store(_) => 503,
            DomainError::Internal { .. } => 500,
        }
    }
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        DomainError::Validation {
            message: err.to_string(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Token(_) => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, "Authentication required")
            }
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            DomainError::Store(_) => {
                ErrorResponse::new(error_codes::CACHE_ERROR, "Token store unavailable")
            }
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
        }
    }
}
