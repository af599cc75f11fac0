//! Donation request lifecycle manager.
//!
//! Implements the donation request driving ports on top of the request store
//! and the user directory. Every status write is a compare-and-swap on the
//! status read during the guard check; a write that matches nothing is
//! re-read to tell a vanished record from a concurrent status change.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AdminStats, CreateDonationRequestRequest, CreateDonationRequestResponse,
    DeleteDonationRequestRequest, DonationRequestCommand, DonationRequestQuery,
    DonationRequestRepository, DonationRequestRepositoryError, DonationRequestView,
    GetDonationRequestRequest, ModifiedResponse, RequesterStats, TransitionStatusRequest,
    UpdateDetailsRequest, UserDirectory,
};
use crate::domain::{
    Actor, Authorizer, DetailsPatch, DetailsValidationError, DonationRequest, DonorAssignment,
    DonorEffect, DonorUpdate, Error, Identity, RequestDetails, RequestId, RequestStatus,
    StatusChange, TransitionGuard, Visibility,
};

const NOT_FOUND_MESSAGE: &str = "Donation request not found.";

fn map_repository_error(error: DonationRequestRepositoryError) -> Error {
    match error {
        DonationRequestRepositoryError::Connection { message } => {
            Error::internal(format!("donation request repository unavailable: {message}"))
        }
        DonationRequestRepositoryError::Query { message } => {
            Error::internal(format!("donation request repository error: {message}"))
        }
    }
}

fn map_details_error(error: DetailsValidationError) -> Error {
    let base = Error::invalid_request(error.to_string());
    match error {
        DetailsValidationError::MissingFields(fields) => {
            base.with_details(json!({ "missingFields": fields }))
        }
        DetailsValidationError::BlankField(field) => base.with_details(json!({ "field": field })),
        DetailsValidationError::InvalidBloodGroup(_) => {
            base.with_details(json!({ "field": "bloodGroup" }))
        }
        DetailsValidationError::InvalidDonorEmail => {
            base.with_details(json!({ "field": "donorEmail" }))
        }
    }
}

fn views(
    requests: Vec<DonationRequest>,
    build: fn(&DonationRequest) -> DonationRequestView,
) -> Vec<DonationRequestView> {
    requests.iter().map(build).collect()
}

/// Lifecycle manager implementing the donation request driving ports.
pub struct DonationRequestService<R, D> {
    requests: Arc<R>,
    authorizer: Authorizer<D>,
    clock: Arc<dyn Clock>,
}

impl<R, D> Clone for DonationRequestService<R, D> {
    fn clone(&self) -> Self {
        Self {
            requests: Arc::clone(&self.requests),
            authorizer: self.authorizer.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, D> DonationRequestService<R, D>
where
    R: DonationRequestRepository,
    D: UserDirectory,
{
    /// Create a service over a request store and a user directory.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use donation_backend::domain::DonationRequestService;
    /// # use donation_backend::domain::ports::{FixtureDonationRequestRepository, FixtureUserDirectory};
    /// # use mockable::DefaultClock;
    /// let service = DonationRequestService::new(
    ///     Arc::new(FixtureDonationRequestRepository),
    ///     Arc::new(FixtureUserDirectory::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(requests: Arc<R>, directory: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            requests,
            authorizer: Authorizer::new(directory),
            clock,
        }
    }

    async fn load(&self, id: &RequestId) -> Result<DonationRequest, Error> {
        self.requests
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND_MESSAGE))
    }

    /// Explain a conditional write that matched no record.
    async fn lost_write(&self, id: &RequestId, expected: RequestStatus) -> Error {
        match self.requests.find_by_id(id).await {
            Ok(None) => Error::not_found(NOT_FOUND_MESSAGE),
            Ok(Some(current)) => {
                warn!(
                    request_id = %id,
                    expected = %expected,
                    found = %current.status(),
                    "conditional write lost to a concurrent update"
                );
                Error::conflict("request status changed concurrently").with_details(json!({
                    "expected": expected,
                    "found": current.status(),
                }))
            }
            Err(err) => map_repository_error(err),
        }
    }

    fn donor_from(
        donor_name: Option<String>,
        donor_email: Option<String>,
    ) -> Result<DonorAssignment, Error> {
        match (donor_name, donor_email) {
            (Some(name), Some(email)) => {
                DonorAssignment::new(name, email).map_err(map_details_error)
            }
            _ => Err(
                Error::invalid_request("Missing donor info to set status to 'inprogress'.")
                    .with_details(json!({ "missingFields": ["donorName", "donorEmail"] })),
            ),
        }
    }

    fn ensure_requester_or_admin(
        request: &DonationRequest,
        actor: &Actor,
        message: &str,
    ) -> Result<(), Error> {
        if request.is_requested_by(actor) || actor.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden(message))
        }
    }
}

#[async_trait]
impl<R, D> DonationRequestCommand for DonationRequestService<R, D>
where
    R: DonationRequestRepository,
    D: UserDirectory,
{
    async fn create_request(
        &self,
        request: CreateDonationRequestRequest,
    ) -> Result<CreateDonationRequestResponse, Error> {
        let actor = self.authorizer.require_active(request.identity).await?;
        let details = RequestDetails::try_from(request.details).map_err(map_details_error)?;

        let created = DonationRequest::new_pending(
            RequestId::random(),
            details,
            actor.email().clone(),
            self.clock.utc(),
        );
        self.requests
            .insert(&created)
            .await
            .map_err(map_repository_error)?;

        info!(request_id = %created.id(), actor = %actor.email(), "donation request created");
        Ok(CreateDonationRequestResponse {
            request_id: created.id(),
        })
    }

    async fn update_details(
        &self,
        request: UpdateDetailsRequest,
    ) -> Result<ModifiedResponse, Error> {
        let actor = self.authorizer.resolve(request.identity).await?;
        let current = self.load(&request.request_id).await?;
        if !current.is_requested_by(&actor) {
            return Err(Error::forbidden(
                "Forbidden: Only the requester can update request details.",
            ));
        }

        let patch = DetailsPatch::try_from(request.patch).map_err(map_details_error)?;
        if patch.is_empty() {
            return Err(Error::no_op("No valid data or status update provided."));
        }

        let modified_count = self
            .requests
            .update_details(&request.request_id, &patch)
            .await
            .map_err(map_repository_error)?;
        if modified_count == 0 {
            return Err(Error::not_found(NOT_FOUND_MESSAGE));
        }

        info!(request_id = %request.request_id, actor = %actor.email(), "donation request details updated");
        Ok(ModifiedResponse { modified_count })
    }

    async fn transition_status(
        &self,
        request: TransitionStatusRequest,
    ) -> Result<ModifiedResponse, Error> {
        let actor = self.authorizer.resolve(request.identity).await?;
        let current = self.load(&request.request_id).await?;

        let rule = current
            .status()
            .transition_to(request.target)
            .map_err(|err| {
                Error::invalid_transition(err.to_string())
                    .with_details(json!({ "from": err.from, "to": err.to }))
            })?;

        let assignment = match rule.guard {
            TransitionGuard::DonorDetailsRequired => {
                Some(Self::donor_from(request.donor_name, request.donor_email)?)
            }
            TransitionGuard::RequesterOrAdmin => {
                Self::ensure_requester_or_admin(
                    &current,
                    &actor,
                    "Forbidden: Only requester or Admin can change this request's status.",
                )?;
                None
            }
        };
        let donor = match (rule.donor, assignment) {
            (DonorEffect::Assign, Some(donor)) => DonorUpdate::Assign(donor),
            (DonorEffect::Assign, None) => {
                return Err(Error::internal("donor assignment missing for transition"));
            }
            (DonorEffect::Keep, _) => DonorUpdate::Keep,
            (DonorEffect::Clear, _) => DonorUpdate::Clear,
        };

        let change = StatusChange {
            expected: rule.from,
            target: rule.to,
            donor,
        };
        let modified_count = self
            .requests
            .transition(&request.request_id, &change)
            .await
            .map_err(map_repository_error)?;
        if modified_count == 0 {
            return Err(self.lost_write(&request.request_id, rule.from).await);
        }

        info!(
            request_id = %request.request_id,
            from = %rule.from,
            to = %rule.to,
            actor = %actor.email(),
            "donation request status changed"
        );
        Ok(ModifiedResponse { modified_count })
    }

    async fn delete_request(&self, request: DeleteDonationRequestRequest) -> Result<(), Error> {
        let actor = self.authorizer.resolve(request.identity).await?;
        let current = self.load(&request.request_id).await?;
        Self::ensure_requester_or_admin(
            &current,
            &actor,
            "Forbidden: You can only delete your own requests (or must be an Admin).",
        )?;

        let admin = actor.is_admin();
        if !admin && current.status() != RequestStatus::Pending {
            return Err(Error::invalid_state(
                "Cannot delete requests that are not 'pending' (unless you are an Admin).",
            )
            .with_details(json!({ "status": current.status() })));
        }

        let expected = (!admin).then_some(RequestStatus::Pending);
        let deleted = self
            .requests
            .delete(&request.request_id, expected)
            .await
            .map_err(map_repository_error)?;
        if deleted == 0 {
            return Err(self.lost_write(&request.request_id, current.status()).await);
        }

        info!(request_id = %request.request_id, actor = %actor.email(), admin, "donation request deleted");
        Ok(())
    }

    async fn admin_delete_request(
        &self,
        request: DeleteDonationRequestRequest,
    ) -> Result<(), Error> {
        let actor = self.authorizer.require_admin(request.identity).await?;
        let deleted = self
            .requests
            .delete(&request.request_id, None)
            .await
            .map_err(map_repository_error)?;
        if deleted == 0 {
            return Err(Error::not_found(NOT_FOUND_MESSAGE));
        }

        info!(request_id = %request.request_id, actor = %actor.email(), "donation request deleted by admin");
        Ok(())
    }
}

#[async_trait]
impl<R, D> DonationRequestQuery for DonationRequestService<R, D>
where
    R: DonationRequestRepository,
    D: UserDirectory,
{
    async fn get_request(
        &self,
        request: GetDonationRequestRequest,
    ) -> Result<DonationRequestView, Error> {
        let actor = self.authorizer.resolve(request.identity).await?;
        let current = self.load(&request.request_id).await?;

        match current.visibility_for(&actor) {
            Visibility::Full => Ok(DonationRequestView::full(&current)),
            Visibility::Redacted => Ok(DonationRequestView::redacted(&current)),
            Visibility::Denied => Err(Error::forbidden(
                "Forbidden: You do not have permission to view this specific request details.",
            )),
        }
    }

    async fn list_my_requests(
        &self,
        identity: Identity,
    ) -> Result<Vec<DonationRequestView>, Error> {
        let requests = self
            .requests
            .list_by_requester(identity.email())
            .await
            .map_err(map_repository_error)?;
        Ok(views(requests, DonationRequestView::full))
    }

    async fn list_pending(&self) -> Result<Vec<DonationRequestView>, Error> {
        let requests = self
            .requests
            .list_by_status(RequestStatus::Pending)
            .await
            .map_err(map_repository_error)?;
        Ok(views(requests, DonationRequestView::redacted))
    }

    async fn list_all_requests(
        &self,
        identity: Identity,
    ) -> Result<Vec<DonationRequestView>, Error> {
        self.authorizer.require_admin(identity).await?;
        let requests = self
            .requests
            .list_all()
            .await
            .map_err(map_repository_error)?;
        Ok(views(requests, DonationRequestView::full))
    }

    async fn admin_stats(&self, identity: Identity) -> Result<AdminStats, Error> {
        self.authorizer.require_admin(identity).await?;
        let by_status = self
            .requests
            .count_by_status(None)
            .await
            .map_err(map_repository_error)?;
        Ok(AdminStats {
            total_requests: by_status.total(),
            by_status,
        })
    }

    async fn requester_stats(&self, identity: Identity) -> Result<RequesterStats, Error> {
        let by_status = self
            .requests
            .count_by_status(Some(identity.email().clone()))
            .await
            .map_err(map_repository_error)?;
        Ok(RequesterStats {
            my_total_requests: by_status.total(),
            by_status,
        })
    }
}

#[cfg(test)]
#[path = "donation_request_service_tests.rs"]
mod tests;
