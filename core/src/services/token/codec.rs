//! Bearer token wire format
//!
//! Tokens use the JWS compact layout: `header.claims.signature`, each segment
//! base64url without padding. The signature covers `header.claims` exactly
//! as transmitted, so any change to either segment fails verification.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::Header;
use serde_json::Value;

use crate::domain::entities::token::ClaimSet;
use crate::errors::{DomainError, DomainResult, TokenError};

use super::signer::Signer;

/// Claims that must be present in every token
const REQUIRED_CLAIMS: [&str; 4] = ["sub", "typ", "iat", "exp"];

/// Encodes claim sets into signed bearer strings and back
pub struct TokenCodec {
    signer: Signer,
    header_segment: String,
}

impl TokenCodec {
    pub fn new(signer: Signer) -> DomainResult<Self> {
        let header = serde_json::to_vec(&Header::new(Signer::ALGORITHM)).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to serialize token header: {}", e),
            }
        })?;

        Ok(Self {
            signer,
            header_segment: URL_SAFE_NO_PAD.encode(header),
        })
    }

    /// Serialize and sign `claims`
    pub fn encode(&self, claims: &ClaimSet) -> DomainResult<String> {
        let payload = serde_json::to_vec(claims).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize claims: {}", e),
        })?;
        let signing_input = format!("{}.{}", self.header_segment, URL_SAFE_NO_PAD.encode(payload));
        let signature = self.signer.sign(signing_input.as_bytes())?;

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Verify and deserialize a bearer string
    ///
    /// Structure and signature are checked before any claim is looked at.
    pub fn decode(&self, token: &str) -> Result<ClaimSet, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::EmptyToken);
        }

        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(TokenError::malformed("expected three non-empty segments"));
        }
        let (header_segment, claims_segment, signature) = (segments[0], segments[1], segments[2]);

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_segment)
            .map_err(|_| TokenError::malformed("header is not base64url"))?;
        let header: Header = serde_json::from_slice(&header_bytes)
            .map_err(|_| TokenError::malformed("header is not a valid JOSE header"))?;
        if header.alg != Signer::ALGORITHM {
            return Err(TokenError::malformed("unsupported signing algorithm"));
        }

        let signing_input = &token[..header_segment.len() + 1 + claims_segment.len()];
        if !self.signer.verify(signing_input.as_bytes(), signature) {
            return Err(TokenError::BadSignature);
        }

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(claims_segment)
            .map_err(|_| TokenError::malformed("claims are not base64url"))?;
        let value: Value = serde_json::from_slice(&claims_bytes)
            .map_err(|_| TokenError::malformed("claims are not JSON"))?;
        let object = value
            .as_object()
            .ok_or_else(|| TokenError::malformed("claims are not a JSON object"))?;

        for claim in REQUIRED_CLAIMS {
            if object.get(claim).map_or(true, Value::is_null) {
                return Err(TokenError::missing(claim));
            }
        }
        if object.get("sub").and_then(Value::as_str) == Some("") {
            return Err(TokenError::missing("sub"));
        }

        serde_json::from_value(value).map_err(|e| TokenError::malformed(format!("invalid claims: {}", e)))
    }
}
