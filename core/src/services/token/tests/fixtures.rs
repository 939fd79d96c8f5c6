//! Shared helpers for token service tests

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::clock::{Clock, ManualClock};
use crate::repositories::InMemoryRevocationStore;
use crate::services::token::{Signer, TokenCodec, TokenService, TokenServiceConfig};

pub const SECRET: &str = "unit-test-signing-secret-0123456789abcdef";

pub struct Harness {
    pub service: TokenService<InMemoryRevocationStore>,
    pub store: Arc<InMemoryRevocationStore>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    /// Current manual time in epoch seconds
    pub fn clock_now(&self) -> i64 {
        self.clock.now().timestamp()
    }

    pub fn clock_now_utc(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

pub fn harness() -> Harness {
    harness_with(TokenServiceConfig::with_secret(SECRET))
}

pub fn harness_with(config: TokenServiceConfig) -> Harness {
    let clock = Arc::new(ManualClock::starting_now());
    let store = Arc::new(InMemoryRevocationStore::with_clock(clock.clone()));
    let service = TokenService::with_clock(store.clone(), config, clock.clone())
        .expect("test configuration is valid");

    Harness {
        service,
        store,
        clock,
    }
}

pub fn codec(secret: &str) -> TokenCodec {
    TokenCodec::new(Signer::new(secret.as_bytes())).expect("codec builds")
}

pub fn b64(value: &Value) -> String {
    URL_SAFE_NO_PAD.encode(value.to_string())
}

/// Signs `header.claims` segments exactly as given
pub fn sign_segments(header: &str, claims: &str, secret: &str) -> String {
    let input = format!("{}.{}", header, claims);
    let signature = Signer::new(secret.as_bytes())
        .sign(input.as_bytes())
        .expect("signing succeeds");
    format!("{}.{}", input, signature)
}

/// Signs arbitrary claims JSON under the standard header
pub fn sign_claims(claims: &Value, secret: &str) -> String {
    sign_segments(&b64(&json!({"alg": "HS256", "typ": "JWT"})), &b64(claims), secret)
}

/// Replaces the first character of segment `index`
pub fn tamper(token: &str, index: usize) -> String {
    tamper_at(token, index, 0)
}

/// Replaces character `position` of segment `index` with a different base64url character
pub fn tamper_at(token: &str, index: usize, position: usize) -> String {
    let mut segments: Vec<String> = token.split('.').map(String::from).collect();
    let segment = &mut segments[index];
    let original = segment.remove(position);
    segment.insert(position, if original == 'A' { 'B' } else { 'A' });
    segments.join(".")
}
