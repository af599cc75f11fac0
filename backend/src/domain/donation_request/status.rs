//! Request status state machine.
//!
//! ```text
//! pending ──assign donor──> inprogress
//!    │                          │
//!    ├──────────done────────────┤──> done      (requester or admin, donor kept)
//!    └─────────canceled─────────┘──> canceled  (requester or admin, donor cleared)
//! ```
//!
//! Every other pair, including a transition to the current status, is
//! rejected. `done` and `canceled` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a donation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for a donor.
    Pending,
    /// A donor has been assigned.
    #[serde(rename = "inprogress")]
    InProgress,
    /// Donation completed.
    Done,
    /// Request withdrawn.
    Canceled,
}

impl RequestStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Done, Self::Canceled];

    /// Stable lowercase label used in storage and JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "inprogress",
            Self::Done => "done",
            Self::Canceled => "canceled",
        }
    }

    /// Whether a donor may be recorded while in this status.
    pub const fn permits_donor(self) -> bool {
        matches!(self, Self::InProgress | Self::Done)
    }

    /// Look up the rule for moving from `self` to `target`.
    ///
    /// # Examples
    /// ```
    /// use donation_backend::domain::{DonorEffect, RequestStatus, TransitionGuard};
    ///
    /// let rule = RequestStatus::Pending
    ///     .transition_to(RequestStatus::InProgress)
    ///     .expect("pending requests accept a donor");
    /// assert_eq!(rule.guard, TransitionGuard::DonorDetailsRequired);
    /// assert_eq!(rule.donor, DonorEffect::Assign);
    ///
    /// assert!(RequestStatus::Done.transition_to(RequestStatus::Pending).is_err());
    /// ```
    pub fn transition_to(self, target: Self) -> Result<TransitionRule, InvalidTransition> {
        use RequestStatus::{Canceled, Done, InProgress, Pending};

        let (guard, donor) = match (self, target) {
            (Pending, InProgress) => (TransitionGuard::DonorDetailsRequired, DonorEffect::Assign),
            (Pending | InProgress, Done) => (TransitionGuard::RequesterOrAdmin, DonorEffect::Keep),
            (Pending | InProgress, Canceled) => {
                (TransitionGuard::RequesterOrAdmin, DonorEffect::Clear)
            }
            (Pending | InProgress | Done | Canceled, _) => {
                return Err(InvalidTransition {
                    from: self,
                    to: target,
                });
            }
        };

        Ok(TransitionRule {
            from: self,
            to: target,
            guard,
            donor,
        })
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownRequestStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "canceled" => Ok(Self::Canceled),
            other => Err(UnknownRequestStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing a status label that is not part of the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown request status: {0}")]
pub struct UnknownRequestStatus(pub String);

/// Raised when no rule exists for a status pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move a request from {from} to {to}")]
pub struct InvalidTransition {
    /// Current status.
    pub from: RequestStatus,
    /// Requested status.
    pub to: RequestStatus,
}

/// Authorization or input check attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionGuard {
    /// Any authenticated caller, but donor name and email must be supplied.
    DonorDetailsRequired,
    /// Only the requester or an admin.
    RequesterOrAdmin,
}

/// What a transition does to the donor fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonorEffect {
    /// Record the supplied donor.
    Assign,
    /// Leave the donor untouched.
    Keep,
    /// Reset the donor to null.
    Clear,
}

/// A legal edge of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    /// Expected stored status at write time.
    pub from: RequestStatus,
    /// Status written on success.
    pub to: RequestStatus,
    /// Check the caller must pass.
    pub guard: TransitionGuard,
    /// Donor side effect.
    pub donor: DonorEffect,
}
