//! HS256 JSON Web Token verification.
//!
//! Tokens are signed by the identity provider with a shared secret and must
//! carry an `email` claim and an `exp` expiry.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{IdentityError, IdentityVerifier};
use crate::domain::{Email, Identity};

const MIN_SECRET_LEN: usize = 32;

/// Errors raised when a configured signing secret is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtSecretError {
    /// The secret is shorter than the minimum length.
    #[error("JWT secret must be at least {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Shared HMAC secret, wiped from memory on drop.
#[derive(Clone)]
pub struct JwtSecret(Zeroizing<Vec<u8>>);

impl JwtSecret {
    /// Wrap configured secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, JwtSecretError> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.len() < MIN_SECRET_LEN {
            return Err(JwtSecretError::TooShort {
                min: MIN_SECRET_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    /// Generate a random secret for development runs.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; 64]);
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(<redacted>)")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    email: String,
    exp: u64,
}

/// Verifies HS256 tokens against a shared secret.
#[derive(Clone)]
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Build a verifier for tokens signed with `secret`.
    pub fn new(secret: &JwtSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => IdentityError::expired(),
                _ => IdentityError::invalid(err.to_string()),
            }
        })?;
        Email::new(&data.claims.email)
            .map(Identity::new)
            .map_err(|err| IdentityError::invalid(format!("email claim: {err}")))
    }
}

#[cfg(test)]
mod tests {
    //! Signature, expiry and claim coverage.

    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use rstest::{fixture, rstest};

    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[fixture]
    fn secret() -> JwtSecret {
        JwtSecret::new(SECRET).expect("secret long enough")
    }

    fn sign(secret: &[u8], email: &str, expires_in: Duration) -> String {
        let exp = (Utc::now() + expires_in).timestamp();
        let claims = Claims {
            email: email.to_owned(),
            exp: u64::try_from(exp).expect("future timestamp"),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .expect("token encodes")
    }

    #[rstest]
    fn valid_token_yields_normalised_email(secret: JwtSecret) {
        let verifier = JwtIdentityVerifier::new(&secret);
        let token = sign(SECRET, "Alice@X.org", Duration::minutes(5));

        let identity = verifier.verify(&token).expect("token verifies");

        assert_eq!(identity.email().as_ref(), "alice@x.org");
    }

    #[rstest]
    fn expired_token_is_rejected(secret: JwtSecret) {
        let verifier = JwtIdentityVerifier::new(&secret);
        let token = sign(SECRET, "alice@x.org", Duration::hours(-2));

        let err = verifier.verify(&token).expect_err("token expired");

        assert_eq!(err, IdentityError::Expired);
    }

    #[rstest]
    fn foreign_signature_is_rejected(secret: JwtSecret) {
        let verifier = JwtIdentityVerifier::new(&secret);
        let token = sign(b"ffffffffffffffffffffffffffffffff", "alice@x.org", Duration::minutes(5));

        let err = verifier.verify(&token).expect_err("bad signature");

        assert!(matches!(err, IdentityError::Invalid { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("not.a.jwt")]
    fn garbage_is_rejected(secret: JwtSecret, #[case] token: &str) {
        let verifier = JwtIdentityVerifier::new(&secret);
        assert!(matches!(
            verifier.verify(token),
            Err(IdentityError::Invalid { .. })
        ));
    }

    #[rstest]
    fn malformed_email_claim_is_rejected(secret: JwtSecret) {
        let verifier = JwtIdentityVerifier::new(&secret);
        let token = sign(SECRET, "nobody", Duration::minutes(5));
        assert!(matches!(
            verifier.verify(&token),
            Err(IdentityError::Invalid { .. })
        ));
    }

    #[rstest]
    fn short_secret_is_refused() {
        assert_eq!(
            JwtSecret::new(b"short".to_vec()).map(|_| ()),
            Err(JwtSecretError::TooShort { min: 32, actual: 5 })
        );
    }

    #[rstest]
    fn debug_output_hides_secret(secret: JwtSecret) {
        assert_eq!(format!("{secret:?}"), "JwtSecret(<redacted>)");
        assert_eq!(JwtSecret::generate().as_bytes().len(), 64);
    }
}
