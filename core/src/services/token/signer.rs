//! HMAC-SHA256 signing over arbitrary byte sequences

use constant_time_eq::constant_time_eq;
use jsonwebtoken::{crypto, Algorithm, EncodingKey};

use crate::errors::{DomainError, DomainResult};

/// Signs and verifies payloads with the single process-wide secret
///
/// Holds nothing but the immutable key, so it can be shared freely across
/// request-handling tasks.
#[derive(Clone)]
pub struct Signer {
    key: EncodingKey,
}

impl Signer {
    /// Signing algorithm for every token
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
        }
    }

    /// Produce the base64url (unpadded) signature of `payload`
    pub fn sign(&self, payload: &[u8]) -> DomainResult<String> {
        crypto::sign(payload, &self.key, Self::ALGORITHM).map_err(|e| DomainError::Internal {
            message: format!("Failed to sign token: {}", e),
        })
    }

    /// Check `signature` against `payload` in constant time
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        match self.sign(payload) {
            Ok(expected) => constant_time_eq(expected.as_bytes(), signature.as_bytes()),
            Err(_) => false,
        }
    }
}
