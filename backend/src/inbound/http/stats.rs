//! Donation request statistics handlers.
//!
//! ```text
//! GET /api/v1/stats/admin-stats
//! GET /api/v1/stats/donor-stats
//! ```

use actix_web::{get, web};

use crate::domain::ports::{AdminStats, RequesterStats};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::schemas::{AdminStatsSchema, ErrorSchema, RequesterStatsSchema};
use crate::inbound::http::state::HttpState;

/// Platform-wide request counters. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/stats/admin-stats",
    responses(
        (status = 200, description = "Request counters", body = AdminStatsSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "adminStats",
    security(("BearerAuth" = []))
)]
#[get("/stats/admin-stats")]
pub async fn admin_stats(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
) -> ApiResult<web::Json<AdminStats>> {
    let stats = state
        .donation_requests_query
        .admin_stats(caller.into_inner())
        .await?;
    Ok(web::Json(stats))
}

/// Counters over the caller's own requests.
#[utoipa::path(
    get,
    path = "/api/v1/stats/donor-stats",
    responses(
        (status = 200, description = "Caller's request counters", body = RequesterStatsSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "donorStats",
    security(("BearerAuth" = []))
)]
#[get("/stats/donor-stats")]
pub async fn donor_stats(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
) -> ApiResult<web::Json<RequesterStats>> {
    let stats = state
        .donation_requests_query
        .requester_stats(caller.into_inner())
        .await?;
    Ok(web::Json(stats))
}

/// Register the statistics routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(admin_stats).service(donor_stats);
}
