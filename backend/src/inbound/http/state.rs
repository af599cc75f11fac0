//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{DonationRequestCommand, DonationRequestQuery, IdentityVerifier};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub donation_requests: Arc<dyn DonationRequestCommand>,
    pub donation_requests_query: Arc<dyn DonationRequestQuery>,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl HttpState {
    /// Construct state from the driving ports and the credential verifier.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use donation_backend::domain::ports::{
    ///     FixtureDonationRequestCommand, FixtureDonationRequestQuery,
    /// };
    /// use donation_backend::inbound::http::state::HttpState;
    /// use donation_backend::outbound::identity::{JwtIdentityVerifier, JwtSecret};
    ///
    /// let secret = JwtSecret::new("k".repeat(32)).expect("long enough");
    /// let state = HttpState::new(
    ///     Arc::new(FixtureDonationRequestCommand),
    ///     Arc::new(FixtureDonationRequestQuery),
    ///     Arc::new(JwtIdentityVerifier::new(&secret)),
    /// );
    /// let _verifier = state.identity.clone();
    /// ```
    pub fn new(
        donation_requests: Arc<dyn DonationRequestCommand>,
        donation_requests_query: Arc<dyn DonationRequestQuery>,
        identity: Arc<dyn IdentityVerifier>,
    ) -> Self {
        Self {
            donation_requests,
            donation_requests_query,
            identity,
        }
    }
}

#[cfg(test)]
impl Default for HttpState {
    fn default() -> Self {
        use crate::domain::ports::{
            FixtureDonationRequestCommand, FixtureDonationRequestQuery, FixtureIdentityVerifier,
        };

        Self::new(
            Arc::new(FixtureDonationRequestCommand),
            Arc::new(FixtureDonationRequestQuery),
            Arc::new(FixtureIdentityVerifier),
        )
    }
}
