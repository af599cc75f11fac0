//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool driven by
//! `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use donation_backend::outbound::persistence::{
//!     DbPool, DieselDonationRequestRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/donations")).await?;
//! let repo = DieselDonationRequestRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_donation_request_repository;
mod diesel_store_health;
mod diesel_user_directory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_donation_request_repository::DieselDonationRequestRepository;
pub use diesel_store_health::DieselStoreHealth;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
