//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the bearer token security scheme.
//! The document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::donation_requests::{
    CreateDonationRequestBody, CreatedResponseBody, MessageResponseBody,
    UpdateDonationRequestBody, UpdatedResponseBody,
};
use crate::inbound::http::schemas::{
    AdminStatsSchema, DonationRequestSchema, ErrorCodeSchema, ErrorSchema, RequestStatusSchema,
    RequesterStatsSchema,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("HS256 token carrying an `email` claim."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blood donation backend API",
        description = "Donation request lifecycle, statistics and health checks.",
        license(name = "ISC", url = "https://opensource.org/license/isc-license-txt")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::donation_requests::create_donation_request,
        crate::inbound::http::donation_requests::list_my_requests,
        crate::inbound::http::donation_requests::list_pending_requests,
        crate::inbound::http::donation_requests::list_all_requests,
        crate::inbound::http::donation_requests::admin_delete_request,
        crate::inbound::http::donation_requests::get_donation_request,
        crate::inbound::http::donation_requests::update_donation_request,
        crate::inbound::http::donation_requests::delete_donation_request,
        crate::inbound::http::stats::admin_stats,
        crate::inbound::http::stats::donor_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RequestStatusSchema,
        DonationRequestSchema,
        AdminStatsSchema,
        RequesterStatsSchema,
        CreateDonationRequestBody,
        UpdateDonationRequestBody,
        CreatedResponseBody,
        UpdatedResponseBody,
        MessageResponseBody,
        crate::inbound::http::health::HealthBody,
        crate::inbound::http::health::HealthStatus,
    )),
    tags(
        (name = "donation-requests", description = "Donation request lifecycle"),
        (name = "stats", description = "Request counters"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
