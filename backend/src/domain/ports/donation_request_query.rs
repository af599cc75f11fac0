//! Driving port for donation request reads and statistics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    BloodGroup, DonationRequest, Email, Error, Identity, RequestId, RequestStatus, StatusCounts,
};

/// Serializable read model of a donation request.
///
/// `requester_email` is `None` in the redacted public view of a pending
/// request and is then omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequestView {
    pub id: RequestId,
    pub recipient_name: String,
    pub recipient_district: String,
    pub recipient_upazila: String,
    pub blood_group: BloodGroup,
    pub donation_date: String,
    pub donation_time: String,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    pub request_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<Email>,
    pub donor_name: Option<String>,
    pub donor_email: Option<Email>,
    pub request_status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl DonationRequestView {
    /// Every field, including the requester email.
    pub fn full(request: &DonationRequest) -> Self {
        let mut view = Self::redacted(request);
        view.requester_email = Some(request.requester_email().clone());
        view
    }

    /// Every field except the requester email.
    pub fn redacted(request: &DonationRequest) -> Self {
        let details = request.details();
        Self {
            id: request.id(),
            recipient_name: details.recipient_name().to_owned(),
            recipient_district: details.recipient_district().to_owned(),
            recipient_upazila: details.recipient_upazila().to_owned(),
            blood_group: details.blood_group(),
            donation_date: details.donation_date().to_owned(),
            donation_time: details.donation_time().to_owned(),
            hospital_name: details.hospital_name().map(str::to_owned),
            full_address: details.full_address().map(str::to_owned),
            request_message: details.request_message().map(str::to_owned),
            requester_email: None,
            donor_name: request.donor().map(|donor| donor.name().to_owned()),
            donor_email: request.donor().map(|donor| donor.email().clone()),
            request_status: request.status(),
            created_at: request.created_at(),
        }
    }
}

/// Request to read a single donation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDonationRequestRequest {
    pub identity: Identity,
    pub request_id: RequestId,
}

/// Platform-wide request counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_requests: u64,
    #[serde(flatten)]
    pub by_status: StatusCounts,
}

/// Counters over the caller's own requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterStats {
    pub my_total_requests: u64,
    #[serde(flatten)]
    pub by_status: StatusCounts,
}

/// Driving port for donation request read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationRequestQuery: Send + Sync {
    /// Read one request, redacted or refused according to the caller.
    async fn get_request(
        &self,
        request: GetDonationRequestRequest,
    ) -> Result<DonationRequestView, Error>;

    /// Requests created by the caller, newest first.
    async fn list_my_requests(&self, identity: Identity)
    -> Result<Vec<DonationRequestView>, Error>;

    /// Pending requests for the public board, newest first and redacted.
    async fn list_pending(&self) -> Result<Vec<DonationRequestView>, Error>;

    /// Every request, newest first. Admin only.
    async fn list_all_requests(
        &self,
        identity: Identity,
    ) -> Result<Vec<DonationRequestView>, Error>;

    /// Platform-wide counters. Admin only.
    async fn admin_stats(&self, identity: Identity) -> Result<AdminStats, Error>;

    /// Counters over the caller's own requests.
    async fn requester_stats(&self, identity: Identity) -> Result<RequesterStats, Error>;
}

/// Fixture query implementation returning empty results.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDonationRequestQuery;

#[async_trait]
impl DonationRequestQuery for FixtureDonationRequestQuery {
    async fn get_request(
        &self,
        request: GetDonationRequestRequest,
    ) -> Result<DonationRequestView, Error> {
        Err(Error::not_found(format!(
            "donation request {} not found",
            request.request_id
        )))
    }

    async fn list_my_requests(
        &self,
        _identity: Identity,
    ) -> Result<Vec<DonationRequestView>, Error> {
        Ok(Vec::new())
    }

    async fn list_pending(&self) -> Result<Vec<DonationRequestView>, Error> {
        Ok(Vec::new())
    }

    async fn list_all_requests(
        &self,
        _identity: Identity,
    ) -> Result<Vec<DonationRequestView>, Error> {
        Ok(Vec::new())
    }

    async fn admin_stats(&self, _identity: Identity) -> Result<AdminStats, Error> {
        Ok(AdminStats {
            total_requests: 0,
            by_status: StatusCounts::default(),
        })
    }

    async fn requester_stats(&self, _identity: Identity) -> Result<RequesterStats, Error> {
        Ok(RequesterStats {
            my_total_requests: 0,
            by_status: StatusCounts::default(),
        })
    }
}
