//! Domain primitives, ports and services.
//!
//! Purpose: define the transport-agnostic donation-request core. Types keep
//! their invariants behind constructors; services implement the driving
//! ports on top of the driven ports declared in [`ports`].
//!
//! Public surface:
//! - `Error`/`ErrorCode`: error payload shared by every adapter.
//! - `DonationRequest` and `RequestStatus`: the aggregate and its state
//!   machine.
//! - `Email`, `Actor` and friends: the caller as seen by the core.
//! - `DonationRequestService`: the lifecycle manager.

pub mod authorization;
pub mod donation_request;
pub mod donation_request_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::authorization::Authorizer;
pub use self::donation_request::{
    BloodGroup, CorruptRecord, DetailsPatch, DetailsPatchDraft, DetailsValidationError,
    DonationRequest, DonationRequestParts, DonorAssignment, DonorEffect, DonorUpdate,
    InvalidTransition, RequestDetails, RequestDetailsDraft, RequestId, RequestStatus,
    StatusChange, StatusCounts, TransitionGuard, TransitionRule, UnknownRequestStatus,
    Visibility,
};
pub use self::donation_request_service::DonationRequestService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{
    AccountStatus, Actor, DirectoryEntry, EMAIL_MAX_CHARS, Email, Identity, Role,
    UserValidationError,
};

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use donation_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
