//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, RequestId, RequestStatus};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidStatus => "invalid_status",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_value(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a path segment into a [`RequestId`].
pub(crate) fn parse_request_id(value: &str) -> Result<RequestId, Error> {
    value.parse().map_err(|_| {
        invalid_value(
            FieldName::new("id"),
            ErrorCode::InvalidUuid,
            "Invalid Request ID format.",
            value,
        )
    })
}

/// Parse a lifecycle status label.
pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<RequestStatus, Error> {
    value.parse().map_err(|_| {
        invalid_value(
            field,
            ErrorCode::InvalidStatus,
            format!(
                "{} must be one of pending, inprogress, done, canceled",
                field.as_str()
            ),
            value,
        )
    })
}
