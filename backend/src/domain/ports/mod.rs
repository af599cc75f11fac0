//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`DonationRequestRepository`, `UserDirectory`,
//! `IdentityVerifier`, `StoreHealth`) are implemented by outbound adapters. Driving ports
//! (`DonationRequestCommand`, `DonationRequestQuery`) are implemented by the
//! domain service and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod donation_request_command;
mod donation_request_query;
mod donation_request_repository;
mod identity_verifier;
mod store_health;
mod user_directory;

#[cfg(test)]
pub use donation_request_command::MockDonationRequestCommand;
pub use donation_request_command::{
    CreateDonationRequestRequest, CreateDonationRequestResponse, DeleteDonationRequestRequest,
    DonationRequestCommand, FixtureDonationRequestCommand, ModifiedResponse,
    TransitionStatusRequest, UpdateDetailsRequest,
};
#[cfg(test)]
pub use donation_request_query::MockDonationRequestQuery;
pub use donation_request_query::{
    AdminStats, DonationRequestQuery, DonationRequestView, FixtureDonationRequestQuery,
    GetDonationRequestRequest, RequesterStats,
};
#[cfg(test)]
pub use donation_request_repository::MockDonationRequestRepository;
pub use donation_request_repository::{
    DonationRequestRepository, DonationRequestRepositoryError, FixtureDonationRequestRepository,
};
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
#[cfg(test)]
pub use identity_verifier::FixtureIdentityVerifier;
pub use identity_verifier::{IdentityError, IdentityVerifier};
#[cfg(test)]
pub use store_health::MockStoreHealth;
pub use store_health::{StoreHealth, StoreHealthError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
