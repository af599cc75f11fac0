//! Port reporting whether the request store can currently serve traffic.
//!
//! Consulted by the readiness endpoint only; lifecycle operations never call it.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Reasons the store failed its health check.
    pub enum StoreHealthError {
        /// The store did not answer a trivial round trip.
        Unavailable { message: String } => "store unavailable: {message}",
    }
}

/// Port answering "can the store take requests right now?".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Succeed when the store answers a trivial round trip.
    async fn check(&self) -> Result<(), StoreHealthError>;
}
