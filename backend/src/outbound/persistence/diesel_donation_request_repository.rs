//! PostgreSQL-backed `DonationRequestRepository` implementation using Diesel.
//!
//! Status transitions and guarded deletes filter on the expected status in
//! the same statement, so PostgreSQL row locking decides concurrent races.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DonationRequestRepository, DonationRequestRepositoryError};
use crate::domain::{
    DetailsPatch, DonationRequest, DonationRequestParts, DonorAssignment, DonorUpdate, Email,
    RequestDetails, RequestDetailsDraft, RequestId, RequestStatus, StatusChange, StatusCounts,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{DetailsChangeset, DonationRequestRow, NewDonationRequestRow, StatusChangeset};
use super::pool::{DbPool, PoolError};
use super::schema::donation_requests;

/// Diesel-backed implementation of the donation request repository port.
#[derive(Clone)]
pub struct DieselDonationRequestRepository {
    pool: DbPool,
}

impl DieselDonationRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DonationRequestRepositoryError {
    map_basic_pool_error(error, DonationRequestRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DonationRequestRepositoryError {
    map_basic_diesel_error(
        error,
        DonationRequestRepositoryError::query,
        DonationRequestRepositoryError::connection,
    )
}

fn corrupt(id: uuid::Uuid, message: impl std::fmt::Display) -> DonationRequestRepositoryError {
    DonationRequestRepositoryError::query(format!("stored request {id} is invalid: {message}"))
}

/// Convert a database row into a validated domain request.
fn row_to_request(row: DonationRequestRow) -> Result<DonationRequest, DonationRequestRepositoryError> {
    let DonationRequestRow {
        id,
        requester_email,
        recipient_name,
        recipient_district,
        recipient_upazila,
        blood_group,
        donation_date,
        donation_time,
        hospital_name,
        full_address,
        request_message,
        request_status,
        donor_name,
        donor_email,
        created_at,
        updated_at: _,
    } = row;

    let details = RequestDetails::try_from(RequestDetailsDraft {
        recipient_name: Some(recipient_name),
        recipient_district: Some(recipient_district),
        recipient_upazila: Some(recipient_upazila),
        blood_group: Some(blood_group),
        donation_date: Some(donation_date),
        donation_time: Some(donation_time),
        hospital_name,
        full_address,
        request_message,
    })
    .map_err(|err| corrupt(id, err))?;
    let requester_email = Email::new(&requester_email).map_err(|err| corrupt(id, err))?;
    let status = request_status
        .parse::<RequestStatus>()
        .map_err(|err| corrupt(id, err))?;
    let donor = match (donor_name, donor_email) {
        (Some(name), Some(email)) => {
            Some(DonorAssignment::new(name, email).map_err(|err| corrupt(id, err))?)
        }
        (None, None) => None,
        _ => return Err(corrupt(id, "donor name and email must be set together")),
    };

    DonationRequest::restore(DonationRequestParts {
        id: RequestId::from_uuid(id),
        details,
        requester_email,
        status,
        donor,
        created_at,
    })
    .map_err(|err| corrupt(id, err))
}

fn rows_to_requests(
    rows: Vec<DonationRequestRow>,
) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
    rows.into_iter().map(row_to_request).collect()
}

fn affected(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

fn details_changeset(patch: &DetailsPatch) -> DetailsChangeset<'_> {
    DetailsChangeset {
        recipient_name: patch.recipient_name.as_deref(),
        recipient_district: patch.recipient_district.as_deref(),
        recipient_upazila: patch.recipient_upazila.as_deref(),
        blood_group: patch.blood_group.map(|group| group.as_str()),
        donation_date: patch.donation_date.as_deref(),
        donation_time: patch.donation_time.as_deref(),
        hospital_name: patch.hospital_name.as_ref().map(Option::as_deref),
        full_address: patch.full_address.as_ref().map(Option::as_deref),
        request_message: patch.request_message.as_ref().map(Option::as_deref),
    }
}

fn status_changeset(change: &StatusChange) -> StatusChangeset<'_> {
    let (donor_name, donor_email) = match &change.donor {
        DonorUpdate::Assign(donor) => (
            Some(Some(donor.name())),
            Some(Some(donor.email().as_ref())),
        ),
        DonorUpdate::Keep => (None, None),
        DonorUpdate::Clear => (Some(None), Some(None)),
    };
    StatusChangeset {
        request_status: change.target.as_str(),
        donor_name,
        donor_email,
    }
}

#[async_trait]
impl DonationRequestRepository for DieselDonationRequestRepository {
    async fn insert(&self, request: &DonationRequest) -> Result<(), DonationRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = request.details();
        let new_row = NewDonationRequestRow {
            id: *request.id().as_uuid(),
            requester_email: request.requester_email().as_ref(),
            recipient_name: details.recipient_name(),
            recipient_district: details.recipient_district(),
            recipient_upazila: details.recipient_upazila(),
            blood_group: details.blood_group().as_str(),
            donation_date: details.donation_date(),
            donation_time: details.donation_time(),
            hospital_name: details.hospital_name(),
            full_address: details.full_address(),
            request_message: details.request_message(),
            request_status: request.status().as_str(),
            created_at: request.created_at(),
        };

        diesel::insert_into(donation_requests::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<DonationRequest>, DonationRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = donation_requests::table
            .filter(donation_requests::id.eq(id.as_uuid()))
            .select(DonationRequestRow::as_select())
            .first::<DonationRequestRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_request).transpose()
    }

    async fn list_by_requester(
        &self,
        requester: &Email,
    ) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DonationRequestRow> = donation_requests::table
            .filter(donation_requests::requester_email.eq(requester.as_ref()))
            .order((donation_requests::created_at.desc(), donation_requests::id.desc()))
            .select(DonationRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_requests(rows)
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DonationRequestRow> = donation_requests::table
            .filter(donation_requests::request_status.eq(status.as_str()))
            .order((donation_requests::created_at.desc(), donation_requests::id.desc()))
            .select(DonationRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_requests(rows)
    }

    async fn list_all(&self) -> Result<Vec<DonationRequest>, DonationRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DonationRequestRow> = donation_requests::table
            .order((donation_requests::created_at.desc(), donation_requests::id.desc()))
            .select(DonationRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_requests(rows)
    }

    async fn update_details(
        &self,
        id: &RequestId,
        patch: &DetailsPatch,
    ) -> Result<u64, DonationRequestRepositoryError> {
        if patch.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(donation_requests::table.filter(donation_requests::id.eq(id.as_uuid())))
            .set(&details_changeset(patch))
            .execute(&mut conn)
            .await
            .map(affected)
            .map_err(map_diesel_error)
    }

    async fn transition(
        &self,
        id: &RequestId,
        change: &StatusChange,
    ) -> Result<u64, DonationRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(
            donation_requests::table.filter(
                donation_requests::id
                    .eq(id.as_uuid())
                    .and(donation_requests::request_status.eq(change.expected.as_str())),
            ),
        )
        .set(&status_changeset(change))
        .execute(&mut conn)
        .await
        .map(affected)
        .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        id: &RequestId,
        expected_status: Option<RequestStatus>,
    ) -> Result<u64, DonationRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let by_id = donation_requests::table.filter(donation_requests::id.eq(id.as_uuid()));

        let deleted = match expected_status {
            Some(status) => {
                diesel::delete(
                    by_id.filter(donation_requests::request_status.eq(status.as_str())),
                )
                .execute(&mut conn)
                .await
            }
            None => diesel::delete(by_id).execute(&mut conn).await,
        };
        deleted.map(affected).map_err(map_diesel_error)
    }

    async fn count_by_status(
        &self,
        requester: Option<Email>,
    ) -> Result<StatusCounts, DonationRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(String, i64)> = match requester {
            Some(email) => {
                donation_requests::table
                    .filter(donation_requests::requester_email.eq(email.as_ref()))
                    .group_by(donation_requests::request_status)
                    .select((donation_requests::request_status, count_star()))
                    .load(&mut conn)
                    .await
            }
            None => {
                donation_requests::table
                    .group_by(donation_requests::request_status)
                    .select((donation_requests::request_status, count_star()))
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        let mut counts = StatusCounts::default();
        for (label, count) in rows {
            let status = label
                .parse::<RequestStatus>()
                .map_err(|err| DonationRequestRepositoryError::query(err.to_string()))?;
            counts.record(status, u64::try_from(count).unwrap_or_default());
        }
        Ok(counts)
    }
}
