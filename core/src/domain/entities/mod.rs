//! Domain entities representing the token payload and its outcomes.

pub mod token;


// Re-export commonly used types
pub use token::{
    ClaimSet, TokenKind, TokenPair, VerifiedRefreshToken,
    DEFAULT_ACCESS_TOKEN_EXPIRY_HOURS, DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS, RESERVED_CLAIMS,
};
