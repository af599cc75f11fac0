//! Donation request HTTP handlers.
//!
//! ```text
//! POST   /api/v1/donation-requests
//! GET    /api/v1/donation-requests/my-requests
//! GET    /api/v1/donation-requests/pending
//! GET    /api/v1/donation-requests/admin/all-requests
//! DELETE /api/v1/donation-requests/admin/{id}
//! GET    /api/v1/donation-requests/{id}
//! PATCH  /api/v1/donation-requests/{id}
//! DELETE /api/v1/donation-requests/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    CreateDonationRequestRequest, DeleteDonationRequestRequest, DonationRequestView,
    GetDonationRequestRequest, TransitionStatusRequest, UpdateDetailsRequest,
};
use crate::domain::{DetailsPatchDraft, RequestDetailsDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::schemas::{DonationRequestSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_request_id, parse_status};

/// Distinguish an explicit JSON `null` from an absent field.
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Request payload for creating a donation request.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequestBody {
    pub recipient_name: Option<String>,
    pub recipient_district: Option<String>,
    pub recipient_upazila: Option<String>,
    #[schema(example = "O+")]
    pub blood_group: Option<String>,
    #[schema(example = "2026-11-02")]
    pub donation_date: Option<String>,
    #[schema(example = "10:30")]
    pub donation_time: Option<String>,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    pub request_message: Option<String>,
}

impl From<CreateDonationRequestBody> for RequestDetailsDraft {
    fn from(body: CreateDonationRequestBody) -> Self {
        Self {
            recipient_name: body.recipient_name,
            recipient_district: body.recipient_district,
            recipient_upazila: body.recipient_upazila,
            blood_group: body.blood_group,
            donation_date: body.donation_date,
            donation_time: body.donation_time,
            hospital_name: body.hospital_name,
            full_address: body.full_address,
            request_message: body.request_message,
        }
    }
}

/// Request payload for editing details or changing status.
///
/// When `requestStatus` is present the request is a status change and the
/// detail fields are ignored. Optional details can be cleared with `null`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonationRequestBody {
    #[schema(example = "inprogress")]
    pub request_status: Option<String>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_district: Option<String>,
    pub recipient_upazila: Option<String>,
    pub blood_group: Option<String>,
    pub donation_date: Option<String>,
    pub donation_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub hospital_name: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub full_address: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub request_message: Option<Option<String>>,
}

impl UpdateDonationRequestBody {
    fn into_patch(self) -> DetailsPatchDraft {
        DetailsPatchDraft {
            recipient_name: self.recipient_name,
            recipient_district: self.recipient_district,
            recipient_upazila: self.recipient_upazila,
            blood_group: self.blood_group,
            donation_date: self.donation_date,
            donation_time: self.donation_time,
            hospital_name: self.hospital_name,
            full_address: self.full_address,
            request_message: self.request_message,
        }
    }
}

/// Response payload for a created request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponseBody {
    pub message: String,
    #[schema(format = "uuid")]
    pub inserted_id: String,
}

/// Response payload for an update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponseBody {
    pub message: String,
    pub modified_count: u64,
}

/// Plain acknowledgement payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponseBody {
    pub message: String,
}

/// Create a pending donation request owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/donation-requests",
    request_body = CreateDonationRequestBody,
    responses(
        (status = 201, description = "Request created", body = CreatedResponseBody),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid token or blocked account", body = ErrorSchema),
        (status = 404, description = "Caller has no account", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donation-requests"],
    operation_id = "createDonationRequest",
    security(("BearerAuth" = []))
)]
#[post("/donation-requests")]
pub async fn create_donation_request(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    payload: web::Json<CreateDonationRequestBody>,
) -> ApiResult<HttpResponse> {
    let response = state
        .donation_requests
        .create_request(CreateDonationRequestRequest {
            identity: caller.into_inner(),
            details: payload.into_inner().into(),
        })
        .await?;

    Ok(HttpResponse::Created().json(CreatedResponseBody {
        message: "Donation request created successfully.".to_owned(),
        inserted_id: response.request_id.to_string(),
    }))
}

/// List the caller's own requests, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/donation-requests/my-requests",
    responses(
        (status = 200, description = "Caller's requests", body = Vec<DonationRequestSchema>),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["donation-requests"],
    operation_id = "listMyDonationRequests",
    security(("BearerAuth" = []))
)]
#[get("/donation-requests/my-requests")]
pub async fn list_my_requests(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
) -> ApiResult<web::Json<Vec<DonationRequestView>>> {
    let views = state
        .donation_requests_query
        .list_my_requests(caller.into_inner())
        .await?;
    Ok(web::Json(views))
}

/// Public board of pending requests without requester emails.
#[utoipa::path(
    get,
    path = "/api/v1/donation-requests/pending",
    responses(
        (status = 200, description = "Pending requests", body = Vec<DonationRequestSchema>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donation-requests"],
    operation_id = "listPendingDonationRequests",
    security(())
)]
#[get("/donation-requests/pending")]
pub async fn list_pending_requests(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DonationRequestView>>> {
    let views = state.donation_requests_query.list_pending().await?;
    Ok(web::Json(views))
}

/// Every request on the platform. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/donation-requests/admin/all-requests",
    responses(
        (status = 200, description = "All requests", body = Vec<DonationRequestSchema>),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema)
    ),
    tags = ["donation-requests"],
    operation_id = "listAllDonationRequests",
    security(("BearerAuth" = []))
)]
#[get("/donation-requests/admin/all-requests")]
pub async fn list_all_requests(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
) -> ApiResult<web::Json<Vec<DonationRequestView>>> {
    let views = state
        .donation_requests_query
        .list_all_requests(caller.into_inner())
        .await?;
    Ok(web::Json(views))
}

/// Delete any request regardless of status. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/donation-requests/admin/{id}",
    params(("id" = String, Path, description = "Donation request id (UUID)")),
    responses(
        (status = 200, description = "Request deleted", body = MessageResponseBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "Request not found", body = ErrorSchema)
    ),
    tags = ["donation-requests"],
    operation_id = "adminDeleteDonationRequest",
    security(("BearerAuth" = []))
)]
#[delete("/donation-requests/admin/{id}")]
pub async fn admin_delete_request(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let request_id = parse_request_id(&path.into_inner())?;
    state
        .donation_requests
        .admin_delete_request(DeleteDonationRequestRequest {
            identity: caller.into_inner(),
            request_id,
        })
        .await?;
    Ok(web::Json(MessageResponseBody {
        message: "Donation request deleted successfully by Admin.".to_owned(),
    }))
}

/// Read one request; pending requests are redacted for third parties.
#[utoipa::path(
    get,
    path = "/api/v1/donation-requests/{id}",
    params(("id" = String, Path, description = "Donation request id (UUID)")),
    responses(
        (status = 200, description = "Request", body = DonationRequestSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 403, description = "Caller may not view this request", body = ErrorSchema),
        (status = 404, description = "Request not found", body = ErrorSchema)
    ),
    tags = ["donation-requests"],
    operation_id = "getDonationRequest",
    security(("BearerAuth" = []))
)]
#[get("/donation-requests/{id}")]
pub async fn get_donation_request(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<DonationRequestView>> {
    let request_id = parse_request_id(&path.into_inner())?;
    let view = state
        .donation_requests_query
        .get_request(GetDonationRequestRequest {
            identity: caller.into_inner(),
            request_id,
        })
        .await?;
    Ok(web::Json(view))
}

/// Edit details, or change status when `requestStatus` is supplied.
#[utoipa::path(
    patch,
    path = "/api/v1/donation-requests/{id}",
    params(("id" = String, Path, description = "Donation request id (UUID)")),
    request_body = UpdateDonationRequestBody,
    responses(
        (status = 200, description = "Request updated", body = UpdatedResponseBody),
        (status = 400, description = "Invalid data, transition or empty update", body = ErrorSchema),
        (status = 403, description = "Caller may not perform this change", body = ErrorSchema),
        (status = 404, description = "Request not found", body = ErrorSchema),
        (status = 409, description = "Status changed concurrently", body = ErrorSchema)
    ),
    tags = ["donation-requests"],
    operation_id = "updateDonationRequest",
    security(("BearerAuth" = []))
)]
#[patch("/donation-requests/{id}")]
pub async fn update_donation_request(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateDonationRequestBody>,
) -> ApiResult<web::Json<UpdatedResponseBody>> {
    let request_id = parse_request_id(&path.into_inner())?;
    let identity = caller.into_inner();
    let mut body = payload.into_inner();

    let response = match body.request_status.take() {
        Some(raw) => {
            let target = parse_status(&raw, FieldName::new("requestStatus"))?;
            state
                .donation_requests
                .transition_status(TransitionStatusRequest {
                    identity,
                    request_id,
                    target,
                    donor_name: body.donor_name,
                    donor_email: body.donor_email,
                })
                .await?
        }
        None => {
            state
                .donation_requests
                .update_details(UpdateDetailsRequest {
                    identity,
                    request_id,
                    patch: body.into_patch(),
                })
                .await?
        }
    };

    Ok(web::Json(UpdatedResponseBody {
        message: "Request updated successfully.".to_owned(),
        modified_count: response.modified_count,
    }))
}

/// Delete a pending request as its requester, or any request as an admin.
#[utoipa::path(
    delete,
    path = "/api/v1/donation-requests/{id}",
    params(("id" = String, Path, description = "Donation request id (UUID)")),
    responses(
        (status = 200, description = "Request deleted", body = MessageResponseBody),
        (status = 400, description = "Malformed id or request not pending", body = ErrorSchema),
        (status = 403, description = "Caller may not delete this request", body = ErrorSchema),
        (status = 404, description = "Request not found", body = ErrorSchema),
        (status = 409, description = "Status changed concurrently", body = ErrorSchema)
    ),
    tags = ["donation-requests"],
    operation_id = "deleteDonationRequest",
    security(("BearerAuth" = []))
)]
#[delete("/donation-requests/{id}")]
pub async fn delete_donation_request(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let request_id = parse_request_id(&path.into_inner())?;
    state
        .donation_requests
        .delete_request(DeleteDonationRequestRequest {
            identity: caller.into_inner(),
            request_id,
        })
        .await?;
    Ok(web::Json(MessageResponseBody {
        message: "Donation request deleted successfully.".to_owned(),
    }))
}

/// Register every donation request route in matching order.
///
/// Literal segments are registered before `{id}` so `pending` and
/// `my-requests` never parse as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_donation_request)
        .service(list_my_requests)
        .service(list_pending_requests)
        .service(list_all_requests)
        .service(admin_delete_request)
        .service(get_donation_request)
        .service(update_donation_request)
        .service(delete_donation_request);
}

#[cfg(test)]
#[path = "donation_requests_tests.rs"]
mod tests;
