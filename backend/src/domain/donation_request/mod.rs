//! Donation request aggregate.
//!
//! A donation request is a single call for blood raised by a requester. Its
//! status only changes through the rules in [`status`]; detail edits go
//! through [`DetailsPatch`]. Both are validated here so adapters can persist
//! the result without re-checking invariants.

mod status;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Actor, Email};

pub use status::{
    DonorEffect, InvalidTransition, RequestStatus, TransitionGuard, TransitionRule,
    UnknownRequestStatus,
};

/// Opaque identifier of a donation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// ABO/Rh blood group of the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    /// A positive.
    #[serde(rename = "A+")]
    APositive,
    /// A negative.
    #[serde(rename = "A-")]
    ANegative,
    /// B positive.
    #[serde(rename = "B+")]
    BPositive,
    /// B negative.
    #[serde(rename = "B-")]
    BNegative,
    /// AB positive.
    #[serde(rename = "AB+")]
    AbPositive,
    /// AB negative.
    #[serde(rename = "AB-")]
    AbNegative,
    /// O positive.
    #[serde(rename = "O+")]
    OPositive,
    /// O negative.
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// Label as written on donor cards.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl FromStr for BloodGroup {
    type Err = DetailsValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A+" => Ok(Self::APositive),
            "A-" => Ok(Self::ANegative),
            "B+" => Ok(Self::BPositive),
            "B-" => Ok(Self::BNegative),
            "AB+" => Ok(Self::AbPositive),
            "AB-" => Ok(Self::AbNegative),
            "O+" => Ok(Self::OPositive),
            "O-" => Ok(Self::ONegative),
            _ => Err(DetailsValidationError::InvalidBloodGroup(s.to_owned())),
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for request details and donor assignments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetailsValidationError {
    /// Required fields were absent or blank. Names use the JSON spelling.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    /// A supplied field was blank.
    #[error("{0} must not be blank")]
    BlankField(&'static str),
    /// The blood group label is not recognised.
    #[error("unknown blood group: {0}")]
    InvalidBloodGroup(String),
    /// The donor email is malformed.
    #[error("donorEmail is not a valid email address")]
    InvalidDonorEmail,
}

/// Field names of the detail allow-list, in JSON spelling.
pub mod field {
    /// Recipient name.
    pub const RECIPIENT_NAME: &str = "recipientName";
    /// Recipient district.
    pub const RECIPIENT_DISTRICT: &str = "recipientDistrict";
    /// Recipient upazila.
    pub const RECIPIENT_UPAZILA: &str = "recipientUpazila";
    /// Blood group.
    pub const BLOOD_GROUP: &str = "bloodGroup";
    /// Donation date.
    pub const DONATION_DATE: &str = "donationDate";
    /// Donation time.
    pub const DONATION_TIME: &str = "donationTime";
    /// Hospital name.
    pub const HOSPITAL_NAME: &str = "hospitalName";
    /// Full address.
    pub const FULL_ADDRESS: &str = "fullAddress";
    /// Free-text message.
    pub const REQUEST_MESSAGE: &str = "requestMessage";
}

/// Unvalidated creation payload. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDetailsDraft {
    /// Recipient name.
    pub recipient_name: Option<String>,
    /// Recipient district.
    pub recipient_district: Option<String>,
    /// Recipient upazila.
    pub recipient_upazila: Option<String>,
    /// Blood group label.
    pub blood_group: Option<String>,
    /// Donation date as entered by the requester.
    pub donation_date: Option<String>,
    /// Donation time as entered by the requester.
    pub donation_time: Option<String>,
    /// Optional hospital name.
    pub hospital_name: Option<String>,
    /// Optional street address.
    pub full_address: Option<String>,
    /// Optional message to donors.
    pub request_message: Option<String>,
}

/// Validated, editable details of a request.
///
/// ## Invariants
/// - Required text fields are non-blank and trimmed.
/// - Optional text fields are either absent or non-blank; blank input is
///   stored as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDetails {
    recipient_name: String,
    recipient_district: String,
    recipient_upazila: String,
    blood_group: BloodGroup,
    donation_date: String,
    donation_time: String,
    hospital_name: Option<String>,
    full_address: Option<String>,
    request_message: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

impl TryFrom<RequestDetailsDraft> for RequestDetails {
    type Error = DetailsValidationError;

    fn try_from(draft: RequestDetailsDraft) -> Result<Self, Self::Error> {
        let recipient_name = present(draft.recipient_name);
        let recipient_district = present(draft.recipient_district);
        let recipient_upazila = present(draft.recipient_upazila);
        let blood_group = present(draft.blood_group);
        let donation_date = present(draft.donation_date);
        let donation_time = present(draft.donation_time);

        let missing: Vec<&'static str> = [
            (field::RECIPIENT_NAME, recipient_name.is_none()),
            (field::RECIPIENT_DISTRICT, recipient_district.is_none()),
            (field::RECIPIENT_UPAZILA, recipient_upazila.is_none()),
            (field::BLOOD_GROUP, blood_group.is_none()),
            (field::DONATION_DATE, donation_date.is_none()),
            (field::DONATION_TIME, donation_time.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (
            recipient_name,
            recipient_district,
            recipient_upazila,
            blood_group,
            donation_date,
            donation_time,
        ) {
            (
                Some(recipient_name),
                Some(recipient_district),
                Some(recipient_upazila),
                Some(blood_group),
                Some(donation_date),
                Some(donation_time),
            ) => Ok(Self {
                recipient_name,
                recipient_district,
                recipient_upazila,
                blood_group: blood_group.parse()?,
                donation_date,
                donation_time,
                hospital_name: present(draft.hospital_name),
                full_address: present(draft.full_address),
                request_message: present(draft.request_message),
            }),
            _ => Err(DetailsValidationError::MissingFields(missing)),
        }
    }
}

impl RequestDetails {
    /// Recipient name.
    pub fn recipient_name(&self) -> &str {
        &self.recipient_name
    }

    /// Recipient district.
    pub fn recipient_district(&self) -> &str {
        &self.recipient_district
    }

    /// Recipient upazila.
    pub fn recipient_upazila(&self) -> &str {
        &self.recipient_upazila
    }

    /// Blood group needed.
    pub fn blood_group(&self) -> BloodGroup {
        self.blood_group
    }

    /// Donation date as entered.
    pub fn donation_date(&self) -> &str {
        &self.donation_date
    }

    /// Donation time as entered.
    pub fn donation_time(&self) -> &str {
        &self.donation_time
    }

    /// Hospital name, if supplied.
    pub fn hospital_name(&self) -> Option<&str> {
        self.hospital_name.as_deref()
    }

    /// Street address, if supplied.
    pub fn full_address(&self) -> Option<&str> {
        self.full_address.as_deref()
    }

    /// Message to donors, if supplied.
    pub fn request_message(&self) -> Option<&str> {
        self.request_message.as_deref()
    }

    /// Merge a validated patch into these details.
    pub fn apply(&mut self, patch: &DetailsPatch) {
        if let Some(value) = &patch.recipient_name {
            self.recipient_name.clone_from(value);
        }
        if let Some(value) = &patch.recipient_district {
            self.recipient_district.clone_from(value);
        }
        if let Some(value) = &patch.recipient_upazila {
            self.recipient_upazila.clone_from(value);
        }
        if let Some(value) = patch.blood_group {
            self.blood_group = value;
        }
        if let Some(value) = &patch.donation_date {
            self.donation_date.clone_from(value);
        }
        if let Some(value) = &patch.donation_time {
            self.donation_time.clone_from(value);
        }
        if let Some(value) = &patch.hospital_name {
            self.hospital_name.clone_from(value);
        }
        if let Some(value) = &patch.full_address {
            self.full_address.clone_from(value);
        }
        if let Some(value) = &patch.request_message {
            self.request_message.clone_from(value);
        }
    }
}

/// Unvalidated detail edit.
///
/// Outer `None` means "leave unchanged". For the optional fields an inner
/// `None` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsPatchDraft {
    /// New recipient name.
    pub recipient_name: Option<String>,
    /// New recipient district.
    pub recipient_district: Option<String>,
    /// New recipient upazila.
    pub recipient_upazila: Option<String>,
    /// New blood group label.
    pub blood_group: Option<String>,
    /// New donation date.
    pub donation_date: Option<String>,
    /// New donation time.
    pub donation_time: Option<String>,
    /// New or cleared hospital name.
    pub hospital_name: Option<Option<String>>,
    /// New or cleared address.
    pub full_address: Option<Option<String>>,
    /// New or cleared message.
    pub request_message: Option<Option<String>>,
}

/// Validated detail edit restricted to the allow-listed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsPatch {
    /// New recipient name.
    pub recipient_name: Option<String>,
    /// New recipient district.
    pub recipient_district: Option<String>,
    /// New recipient upazila.
    pub recipient_upazila: Option<String>,
    /// New blood group.
    pub blood_group: Option<BloodGroup>,
    /// New donation date.
    pub donation_date: Option<String>,
    /// New donation time.
    pub donation_time: Option<String>,
    /// New or cleared hospital name.
    pub hospital_name: Option<Option<String>>,
    /// New or cleared address.
    pub full_address: Option<Option<String>>,
    /// New or cleared message.
    pub request_message: Option<Option<String>>,
}

fn required_edit(
    value: Option<String>,
    name: &'static str,
) -> Result<Option<String>, DetailsValidationError> {
    value
        .map(|raw| present(Some(raw)).ok_or(DetailsValidationError::BlankField(name)))
        .transpose()
}

impl TryFrom<DetailsPatchDraft> for DetailsPatch {
    type Error = DetailsValidationError;

    fn try_from(draft: DetailsPatchDraft) -> Result<Self, Self::Error> {
        let blood_group = required_edit(draft.blood_group, field::BLOOD_GROUP)?
            .map(|label| label.parse::<BloodGroup>())
            .transpose()?;

        Ok(Self {
            recipient_name: required_edit(draft.recipient_name, field::RECIPIENT_NAME)?,
            recipient_district: required_edit(draft.recipient_district, field::RECIPIENT_DISTRICT)?,
            recipient_upazila: required_edit(draft.recipient_upazila, field::RECIPIENT_UPAZILA)?,
            blood_group,
            donation_date: required_edit(draft.donation_date, field::DONATION_DATE)?,
            donation_time: required_edit(draft.donation_time, field::DONATION_TIME)?,
            hospital_name: draft.hospital_name.map(present),
            full_address: draft.full_address.map(present),
            request_message: draft.request_message.map(present),
        })
    }
}

impl DetailsPatch {
    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Donor recorded against an in-progress or completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorAssignment {
    name: String,
    email: Email,
}

impl DonorAssignment {
    /// Validate a donor name/email pair.
    pub fn new(name: impl AsRef<str>, email: impl AsRef<str>) -> Result<Self, DetailsValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DetailsValidationError::BlankField("donorName"));
        }
        let email = Email::new(email).map_err(|_| DetailsValidationError::InvalidDonorEmail)?;
        Ok(Self {
            name: name.to_owned(),
            email,
        })
    }

    /// Donor display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Donor email.
    pub fn email(&self) -> &Email {
        &self.email
    }
}

/// The write a successful transition performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Status the record must still have at write time.
    pub expected: RequestStatus,
    /// Status to write.
    pub target: RequestStatus,
    /// Donor fields after the write.
    pub donor: DonorUpdate,
}

/// Donor side of a [`StatusChange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonorUpdate {
    /// Store this donor.
    Assign(DonorAssignment),
    /// Leave the stored donor unchanged.
    Keep,
    /// Null both donor fields.
    Clear,
}

/// Raised when stored fields break the aggregate invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("donor recorded on a {0} request")]
pub struct CorruptRecord(pub RequestStatus);

/// Every stored field of a request, used to rehydrate from persistence.
#[derive(Debug, Clone)]
pub struct DonationRequestParts {
    /// Identifier.
    pub id: RequestId,
    /// Editable details.
    pub details: RequestDetails,
    /// Creator.
    pub requester_email: Email,
    /// Current status.
    pub status: RequestStatus,
    /// Assigned donor.
    pub donor: Option<DonorAssignment>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A single call for blood.
///
/// ## Invariants
/// - `requester_email` and `created_at` never change after creation.
/// - A donor is only present while the status is `inprogress` or `done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationRequest {
    id: RequestId,
    details: RequestDetails,
    requester_email: Email,
    status: RequestStatus,
    donor: Option<DonorAssignment>,
    created_at: DateTime<Utc>,
}

/// How much of a request an actor may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Every field.
    Full,
    /// Everything except the requester email.
    Redacted,
    /// Nothing.
    Denied,
}

impl DonationRequest {
    /// Create a fresh pending request without a donor.
    pub fn new_pending(
        id: RequestId,
        details: RequestDetails,
        requester_email: Email,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            details,
            requester_email,
            status: RequestStatus::Pending,
            donor: None,
            created_at,
        }
    }

    /// Rehydrate a stored request, checking the donor invariant.
    pub fn restore(parts: DonationRequestParts) -> Result<Self, CorruptRecord> {
        if parts.donor.is_some() && !parts.status.permits_donor() {
            return Err(CorruptRecord(parts.status));
        }
        Ok(Self {
            id: parts.id,
            details: parts.details,
            requester_email: parts.requester_email,
            status: parts.status,
            donor: parts.donor,
            created_at: parts.created_at,
        })
    }

    /// Identifier.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Editable details.
    pub fn details(&self) -> &RequestDetails {
        &self.details
    }

    /// Creator email.
    pub fn requester_email(&self) -> &Email {
        &self.requester_email
    }

    /// Current status.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Assigned donor, if any.
    pub fn donor(&self) -> Option<&DonorAssignment> {
        self.donor.as_ref()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `actor` created this request.
    pub fn is_requested_by(&self, actor: &Actor) -> bool {
        actor.is(&self.requester_email)
    }

    /// Whether `actor` is the donor of this in-progress request.
    pub fn is_assigned_to(&self, actor: &Actor) -> bool {
        self.status == RequestStatus::InProgress
            && self.donor.as_ref().is_some_and(|donor| actor.is(donor.email()))
    }

    /// Decide how much of this request `actor` may read.
    ///
    /// Pending requests are public once the requester email is removed.
    pub fn visibility_for(&self, actor: &Actor) -> Visibility {
        let requester = self.is_requested_by(actor);
        let admin = actor.is_admin();
        if self.status == RequestStatus::Pending && !requester && !admin {
            return Visibility::Redacted;
        }
        if requester || admin || self.is_assigned_to(actor) {
            return Visibility::Full;
        }
        Visibility::Denied
    }

    /// Merge a detail edit.
    pub fn apply_details(&mut self, patch: &DetailsPatch) {
        self.details.apply(patch);
    }

    /// Apply a status change whose expected status has already been matched.
    pub fn apply_status_change(&mut self, change: &StatusChange) {
        self.status = change.target;
        match &change.donor {
            DonorUpdate::Assign(donor) => self.donor = Some(donor.clone()),
            DonorUpdate::Keep => {}
            DonorUpdate::Clear => self.donor = None,
        }
    }
}

/// Number of requests in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Pending requests.
    pub pending: u64,
    /// In-progress requests.
    pub inprogress: u64,
    /// Completed requests.
    pub done: u64,
    /// Canceled requests.
    pub canceled: u64,
}

impl StatusCounts {
    /// Add `count` requests in `status`.
    pub fn record(&mut self, status: RequestStatus, count: u64) {
        let slot = match status {
            RequestStatus::Pending => &mut self.pending,
            RequestStatus::InProgress => &mut self.inprogress,
            RequestStatus::Done => &mut self.done,
            RequestStatus::Canceled => &mut self.canceled,
        };
        *slot = slot.saturating_add(count);
    }

    /// Sum across all statuses.
    pub fn total(&self) -> u64 {
        self.pending
            .saturating_add(self.inprogress)
            .saturating_add(self.done)
            .saturating_add(self.canceled)
    }
}

impl FromIterator<RequestStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = RequestStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.record(status, 1);
        }
        counts
    }
}
