//! OpenAPI schema definitions for domain and port types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their JSON shape and live in the inbound adapter
//! where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Bearer token missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The caller's account is blocked.
    #[schema(rename = "account_blocked")]
    AccountBlocked,
    /// The resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The status change is not allowed from the current status.
    #[schema(rename = "invalid_transition")]
    InvalidTransition,
    /// The update carried nothing to apply.
    #[schema(rename = "no_op")]
    NoOp,
    /// The record's status forbids the operation.
    #[schema(rename = "invalid_state")]
    InvalidState,
    /// The record changed concurrently.
    #[schema(rename = "conflict")]
    Conflict,
    /// Unexpected server failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
#[serde(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_transition")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "cannot move a request from done to pending")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as `missingFields`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::RequestStatus`].
#[derive(ToSchema)]
#[schema(as = RequestStatus)]
pub enum RequestStatusSchema {
    /// Waiting for a donor.
    #[schema(rename = "pending")]
    Pending,
    /// Donor assigned.
    #[schema(rename = "inprogress")]
    InProgress,
    /// Donation completed.
    #[schema(rename = "done")]
    Done,
    /// Request withdrawn.
    #[schema(rename = "canceled")]
    Canceled,
}

/// OpenAPI schema for [`crate::domain::ports::DonationRequestView`].
#[derive(ToSchema)]
#[schema(as = DonationRequest)]
#[serde(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct DonationRequestSchema {
    #[schema(format = "uuid")]
    id: String,
    recipient_name: String,
    recipient_district: String,
    recipient_upazila: String,
    #[schema(example = "O+")]
    blood_group: String,
    donation_date: String,
    donation_time: String,
    hospital_name: Option<String>,
    full_address: Option<String>,
    request_message: Option<String>,
    /// Omitted from the public view of pending requests.
    #[schema(format = "email")]
    requester_email: Option<String>,
    donor_name: Option<String>,
    #[schema(format = "email")]
    donor_email: Option<String>,
    request_status: RequestStatusSchema,
    #[schema(format = "date-time")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ports::AdminStats`].
#[derive(ToSchema)]
#[schema(as = AdminStats)]
#[serde(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct AdminStatsSchema {
    total_requests: u64,
    pending: u64,
    inprogress: u64,
    done: u64,
    canceled: u64,
}

/// OpenAPI schema for [`crate::domain::ports::RequesterStats`].
#[derive(ToSchema)]
#[schema(as = RequesterStats)]
#[serde(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RequesterStatsSchema {
    my_total_requests: u64,
    pending: u64,
    inprogress: u64,
    done: u64,
    canceled: u64,
}
