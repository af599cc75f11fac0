//! Port for donation request persistence (the request store).
//!
//! Status writes are conditional: adapters must only apply a
//! [`StatusChange`] while the stored status still equals
//! `change.expected`, and report how many records they touched so the
//! service can tell a lost race from a successful write.

use async_trait::async_trait;

use crate::domain::{
    DetailsPatch, DonationRequest, Email, RequestId, RequestStatus, StatusChange, StatusCounts,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by donation request repository adapters.
    pub enum DonationRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "donation request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "donation request repository query failed: {message}",
    }
}

/// Port for reading and writing donation requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationRequestRepository: Send + Sync {
    /// Persist a newly created request.
    async fn insert(&self, request: &DonationRequest) -> Result<(), DonationRequestRepositoryError>;

    /// Find a request by id.
    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<DonationRequest>, DonationRequestRepositoryError>;

    /// Requests created by `requester`, newest first.
    async fn list_by_requester(
        &self,
        requester: &Email,
    ) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError>;

    /// Requests currently in `status`, newest first.
    async fn list_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError>;

    /// Every request, newest first.
    async fn list_all(&self) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError>;

    /// Merge a detail patch. Returns the number of records matched.
    async fn update_details(
        &self,
        id: &RequestId,
        patch: &DetailsPatch,
    ) -> Result<u64, DonationRequestRepositoryError>;

    /// Apply `change` only if the stored status equals `change.expected`.
    ///
    /// Returns the number of records written; zero means the record is gone
    /// or its status moved since it was read.
    async fn transition(
        &self,
        id: &RequestId,
        change: &StatusChange,
    ) -> Result<u64, DonationRequestRepositoryError>;

    /// Delete a request, optionally only while it still has `expected_status`.
    async fn delete(
        &self,
        id: &RequestId,
        expected_status: Option<RequestStatus>,
    ) -> Result<u64, DonationRequestRepositoryError>;

    /// Count requests per status, restricted to one requester when given.
    async fn count_by_status(
        &self,
        requester: Option<Email>,
    ) -> Result<StatusCounts, DonationRequestRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDonationRequestRepository;

#[async_trait]
impl DonationRequestRepository for FixtureDonationRequestRepository {
    async fn insert(&self, _request: &DonationRequest) -> Result<(), DonationRequestRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &RequestId,
    ) -> Result<Option<DonationRequest>, DonationRequestRepositoryError> {
        Ok(None)
    }

    async fn list_by_requester(
        &self,
        _requester: &Email,
    ) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_by_status(
        &self,
        _status: RequestStatus,
    ) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_details(
        &self,
        _id: &RequestId,
        _patch: &DetailsPatch,
    ) -> Result<u64, DonationRequestRepositoryError> {
        Ok(0)
    }

    async fn transition(
        &self,
        _id: &RequestId,
        _change: &StatusChange,
    ) -> Result<u64, DonationRequestRepositoryError> {
        Ok(0)
    }

    async fn delete(
        &self,
        _id: &RequestId,
        _expected_status: Option<RequestStatus>,
    ) -> Result<u64, DonationRequestRepositoryError> {
        Ok(0)
    }

    async fn count_by_status(
        &self,
        _requester: Option<Email>,
    ) -> Result<StatusCounts, DonationRequestRepositoryError> {
        Ok(StatusCounts::default())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::DonorUpdate;

    #[rstest]
    #[tokio::test]
    async fn fixture_find_returns_none() {
        let repo = FixtureDonationRequestRepository;
        let found = repo
            .find_by_id(&RequestId::random())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_transition_touches_nothing() {
        let repo = FixtureDonationRequestRepository;
        let change = StatusChange {
            expected: RequestStatus::Pending,
            target: RequestStatus::Canceled,
            donor: DonorUpdate::Clear,
        };
        let written = repo
            .transition(&RequestId::random(), &change)
            .await
            .expect("fixture transition succeeds");
        assert_eq!(written, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_counts_are_zero() {
        let repo = FixtureDonationRequestRepository;
        let counts = repo.count_by_status(None).await.expect("fixture counts");
        assert_eq!(counts.total(), 0);
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = DonationRequestRepositoryError::connection("pool timed out");
        assert!(err.to_string().contains("pool timed out"));
    }
}
