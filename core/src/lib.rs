//! # EduAuth Core
//!
//! Bearer-token authentication for the EduAuth backend.
//! This crate contains the token entities, the token services, the
//! revocation store interface and the error types the outer layers build on.

pub mod clock;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::token::{
    extract_bearer_token, RotationDecision, RotationPolicy, TokenService, TokenServiceConfig,
};
