//! Bearer credential verification adapters.

mod jwt;

pub use jwt::{JwtIdentityVerifier, JwtSecret, JwtSecretError};
