//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{donation_requests, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub email: String,
    pub role: String,
    pub status: String,
}

/// Row struct for reading from the donation_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = donation_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DonationRequestRow {
    pub id: Uuid,
    pub requester_email: String,
    pub recipient_name: String,
    pub recipient_district: String,
    pub recipient_upazila: String,
    pub blood_group: String,
    pub donation_date: String,
    pub donation_time: String,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    pub request_message: Option<String>,
    pub request_status: String,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "maintained by trigger; not part of the domain model")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new donation requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = donation_requests)]
pub(crate) struct NewDonationRequestRow<'a> {
    pub id: Uuid,
    pub requester_email: &'a str,
    pub recipient_name: &'a str,
    pub recipient_district: &'a str,
    pub recipient_upazila: &'a str,
    pub blood_group: &'a str,
    pub donation_date: &'a str,
    pub donation_time: &'a str,
    pub hospital_name: Option<&'a str>,
    pub full_address: Option<&'a str>,
    pub request_message: Option<&'a str>,
    pub request_status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Changeset for detail edits.
///
/// `None` leaves a column untouched; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = donation_requests)]
pub(crate) struct DetailsChangeset<'a> {
    pub recipient_name: Option<&'a str>,
    pub recipient_district: Option<&'a str>,
    pub recipient_upazila: Option<&'a str>,
    pub blood_group: Option<&'a str>,
    pub donation_date: Option<&'a str>,
    pub donation_time: Option<&'a str>,
    pub hospital_name: Option<Option<&'a str>>,
    pub full_address: Option<Option<&'a str>>,
    pub request_message: Option<Option<&'a str>>,
}

/// Changeset for a status transition and its donor effect.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = donation_requests)]
pub(crate) struct StatusChangeset<'a> {
    pub request_status: &'a str,
    pub donor_name: Option<Option<&'a str>>,
    pub donor_email: Option<Option<&'a str>>,
}
