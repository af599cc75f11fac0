//! Port for verifying bearer credentials.
//!
//! Token issuance lives outside this service; the core only needs the email
//! claim of a credential that has already been signed elsewhere.

use crate::domain::Identity;

use super::define_port_error;

define_port_error! {
    /// Reasons a bearer credential was rejected.
    pub enum IdentityError {
        /// The token has expired.
        Expired => "token expired",
        /// The token failed signature or claim validation.
        Invalid { message: String } => "invalid token: {message}",
    }
}

/// Port turning a raw bearer token into an authenticated identity.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `token` and return the identity it asserts.
    fn verify(&self, token: &str) -> Result<Identity, IdentityError>;
}

/// Unit-test verifier that treats the token itself as the caller's email.
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityVerifier;

#[cfg(test)]
impl IdentityVerifier for FixtureIdentityVerifier {
    fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        crate::domain::Email::new(token)
            .map(Identity::new)
            .map_err(|err| IdentityError::invalid(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn fixture_accepts_email_tokens() {
        let identity = FixtureIdentityVerifier
            .verify("Alice@X.org")
            .expect("email token");
        assert_eq!(identity.email().as_ref(), "alice@x.org");
    }

    #[rstest]
    fn fixture_rejects_non_email_tokens() {
        let err = FixtureIdentityVerifier
            .verify("not-an-email")
            .expect_err("invalid token");
        assert!(matches!(err, IdentityError::Invalid { .. }));
    }
}
