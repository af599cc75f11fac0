//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod donation_requests;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
