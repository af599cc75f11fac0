//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. When
//! migrations change, regenerate with `diesel print-schema` or update by hand.

diesel::table! {
    /// Directory of accounts known to the platform.
    ///
    /// Maintained by the user management service; read-only here.
    users (email) {
        /// Normalised email address (primary key).
        email -> Varchar,
        /// `donor`, `volunteer` or `admin`.
        role -> Varchar,
        /// `active` or `blocked`.
        status -> Varchar,
    }
}

diesel::table! {
    /// Blood donation requests and their lifecycle state.
    donation_requests (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Email of the account that created the request.
        requester_email -> Varchar,
        recipient_name -> Text,
        recipient_district -> Text,
        recipient_upazila -> Text,
        /// One of the eight ABO/Rh labels.
        blood_group -> Varchar,
        donation_date -> Text,
        donation_time -> Text,
        hospital_name -> Nullable<Text>,
        full_address -> Nullable<Text>,
        request_message -> Nullable<Text>,
        /// `pending`, `inprogress`, `done` or `canceled`.
        request_status -> Varchar,
        /// Set together with `donor_email` while in progress or done.
        donor_name -> Nullable<Text>,
        donor_email -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}
