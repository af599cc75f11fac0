//! Driving port for donation request mutations.
//!
//! Every operation carries the authenticated [`Identity`] of the caller; the
//! implementation resolves it against the user directory before applying
//! any guard.

use async_trait::async_trait;

use crate::domain::{
    DetailsPatchDraft, Error, Identity, RequestDetails, RequestDetailsDraft, RequestId,
    RequestStatus,
};

/// Request to create a donation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDonationRequestRequest {
    pub identity: Identity,
    pub details: RequestDetailsDraft,
}

/// Response from creating a donation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateDonationRequestResponse {
    pub request_id: RequestId,
}

/// Request to edit the details of a donation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDetailsRequest {
    pub identity: Identity,
    pub request_id: RequestId,
    pub patch: DetailsPatchDraft,
}

/// Request to move a donation request to another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionStatusRequest {
    pub identity: Identity,
    pub request_id: RequestId,
    pub target: RequestStatus,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
}

/// Number of records an update touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifiedResponse {
    pub modified_count: u64,
}

/// Request to delete a donation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDonationRequestRequest {
    pub identity: Identity,
    pub request_id: RequestId,
}

/// Driving port for donation request write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationRequestCommand: Send + Sync {
    /// Create a pending request owned by the caller.
    ///
    /// Fails with `not_found` when the caller has no directory entry,
    /// `account_blocked` when the entry is blocked and `invalid_request`
    /// listing every missing field.
    async fn create_request(
        &self,
        request: CreateDonationRequestRequest,
    ) -> Result<CreateDonationRequestResponse, Error>;

    /// Merge allow-listed detail fields. Requester only.
    async fn update_details(&self, request: UpdateDetailsRequest)
    -> Result<ModifiedResponse, Error>;

    /// Move a request along the status state machine.
    async fn transition_status(
        &self,
        request: TransitionStatusRequest,
    ) -> Result<ModifiedResponse, Error>;

    /// Delete a request as its requester (pending only) or as an admin.
    async fn delete_request(&self, request: DeleteDonationRequestRequest) -> Result<(), Error>;

    /// Delete any request regardless of status. Admin only.
    async fn admin_delete_request(
        &self,
        request: DeleteDonationRequestRequest,
    ) -> Result<(), Error>;
}

/// Fixture command implementation for tests that do not need persistence.
///
/// Validates payloads like the real service but never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDonationRequestCommand;

#[async_trait]
impl DonationRequestCommand for FixtureDonationRequestCommand {
    async fn create_request(
        &self,
        request: CreateDonationRequestRequest,
    ) -> Result<CreateDonationRequestResponse, Error> {
        RequestDetails::try_from(request.details)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(CreateDonationRequestResponse {
            request_id: RequestId::random(),
        })
    }

    async fn update_details(
        &self,
        _request: UpdateDetailsRequest,
    ) -> Result<ModifiedResponse, Error> {
        Ok(ModifiedResponse { modified_count: 0 })
    }

    async fn transition_status(
        &self,
        _request: TransitionStatusRequest,
    ) -> Result<ModifiedResponse, Error> {
        Ok(ModifiedResponse { modified_count: 0 })
    }

    async fn delete_request(&self, request: DeleteDonationRequestRequest) -> Result<(), Error> {
        Err(Error::not_found(format!(
            "donation request {} not found",
            request.request_id
        )))
    }

    async fn admin_delete_request(
        &self,
        request: DeleteDonationRequestRequest,
    ) -> Result<(), Error> {
        Err(Error::not_found(format!(
            "donation request {} not found",
            request.request_id
        )))
    }
}
