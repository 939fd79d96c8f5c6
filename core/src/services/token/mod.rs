//! Token service module
//!
//! This module handles every bearer-token operation:
//! - HS256 signing and the compact wire format
//! - Access and refresh token issuance
//! - Validation against expiry, type and the revocation store
//! - Sliding-window refresh token rotation and logout revocation

mod codec;
mod config;
mod issuer;
mod rotation;
mod service;
mod signer;
mod validator;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use rotation::{RotationDecision, RotationPolicy};
pub use service::{extract_bearer_token, TokenService};
pub use signer::Signer;
pub use validator::TokenValidator;
