//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::DonationRequestService;
use crate::domain::ports::FixtureIdentityVerifier;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryDonationRequestRepository, InMemoryUserDirectory};

/// Build HTTP state over fresh in-memory adapters.
///
/// Bearer tokens are treated as the caller's email by
/// [`FixtureIdentityVerifier`], so tests authenticate with
/// `Authorization: Bearer alice@x.org`.
pub fn in_memory_state(directory: InMemoryUserDirectory) -> HttpState {
    let service = Arc::new(DonationRequestService::new(
        Arc::new(InMemoryDonationRequestRepository::default()),
        Arc::new(directory),
        Arc::new(DefaultClock),
    ));
    HttpState::new(service.clone(), service, Arc::new(FixtureIdentityVerifier))
}
