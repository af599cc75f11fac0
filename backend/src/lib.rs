//! Blood donation request backend.
//!
//! The [`domain`] module holds the request lifecycle and its ports,
//! [`inbound`] exposes it over HTTP and [`outbound`] provides the storage,
//! directory and credential adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
