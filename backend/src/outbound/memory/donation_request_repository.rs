//! In-memory `DonationRequestRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    DonationRequestRepository, DonationRequestRepositoryError, StoreHealth, StoreHealthError,
};
use crate::domain::{
    DetailsPatch, DonationRequest, Email, RequestId, RequestStatus, StatusChange, StatusCounts,
};

/// Request store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDonationRequestRepository {
    requests: RwLock<HashMap<RequestId, DonationRequest>>,
}

impl InMemoryDonationRequestRepository {
    /// Snapshot matching requests ordered newest first.
    async fn collect<F>(&self, keep: F) -> Vec<DonationRequest>
    where
        F: Fn(&DonationRequest) -> bool,
    {
        let requests = self.requests.read().await;
        let mut matching: Vec<DonationRequest> =
            requests.values().filter(|request| keep(request)).cloned().collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        matching
    }
}

#[async_trait]
impl DonationRequestRepository for InMemoryDonationRequestRepository {
    async fn insert(&self, request: &DonationRequest) -> Result<(), DonationRequestRepositoryError> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.id()) {
            return Err(DonationRequestRepositoryError::query(format!(
                "duplicate request id {}",
                request.id()
            )));
        }
        requests.insert(request.id(), request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<DonationRequest>, DonationRequestRepositoryError> {
        Ok(self.requests.read().await.get(id).cloned())
    }

    async fn list_by_requester(
        &self,
        requester: &Email,
    ) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
        Ok(self
            .collect(|request| request.requester_email() == requester)
            .await)
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
        Ok(self.collect(|request| request.status() == status).await)
    }

    async fn list_all(&self) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
        Ok(self.collect(|_| true).await)
    }

    async fn update_details(
        &self,
        id: &RequestId,
        patch: &DetailsPatch,
    ) -> Result<u64, DonationRequestRepositoryError> {
        let mut requests = self.requests.write().await;
        let Some(request) = requests.get_mut(id) else {
            return Ok(0);
        };
        request.apply_details(patch);
        Ok(1)
    }

    async fn transition(
        &self,
        id: &RequestId,
        change: &StatusChange,
    ) -> Result<u64, DonationRequestRepositoryError> {
        let mut requests = self.requests.write().await;
        match requests.get_mut(id) {
            Some(request) if request.status() == change.expected => {
                request.apply_status_change(change);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete(
        &self,
        id: &RequestId,
        expected_status: Option<RequestStatus>,
    ) -> Result<u64, DonationRequestRepositoryError> {
        let mut requests = self.requests.write().await;
        let matches = requests.get(id).is_some_and(|request| {
            expected_status.is_none_or(|expected| request.status() == expected)
        });
        if !matches {
            return Ok(0);
        }
        requests.remove(id);
        Ok(1)
    }

    async fn count_by_status(
        &self,
        requester: Option<Email>,
    ) -> Result<StatusCounts, DonationRequestRepositoryError> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .filter(|request| {
                requester
                    .as_ref()
                    .is_none_or(|email| request.requester_email() == email)
            })
            .map(DonationRequest::status)
            .collect())
    }
}

#[async_trait]
impl StoreHealth for InMemoryDonationRequestRepository {
    async fn check(&self) -> Result<(), StoreHealthError> {
        Ok(())
    }
}
