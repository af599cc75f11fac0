//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed request store and user directory
//!   using Diesel
//! - **memory**: process-local adapters for development and tests
//! - **identity**: JWT bearer token verification
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod identity;
pub mod memory;
pub mod persistence;
