//! In-memory adapters for running without PostgreSQL.
//!
//! Both adapters keep their state behind a `tokio::sync::RwLock`; status
//! compare-and-swap happens while the write lock is held.

mod donation_request_repository;
mod user_directory;

pub use donation_request_repository::InMemoryDonationRequestRepository;
pub use user_directory::{DirectorySeedError, InMemoryUserDirectory};
