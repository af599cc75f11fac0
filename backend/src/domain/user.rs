//! Platform user identity as seen by the donation-request core.
//!
//! The core never owns user records. It only reads the role and account
//! status of an email address from the user directory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Longest accepted address, matching the `VARCHAR(320)` email columns.
pub const EMAIL_MAX_CHARS: usize = 320;

/// Validation errors returned by [`Email::new`] and the enum parsers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email was not of the form `local@domain`.
    #[error("email must contain a single @ between a local part and a domain")]
    MalformedEmail,
    /// The email exceeds [`EMAIL_MAX_CHARS`].
    #[error("email must be at most {max} characters, got {actual}")]
    EmailTooLong { max: usize, actual: usize },
    /// The role string is not one of the known roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),
    /// The account status string is not one of the known statuses.
    #[error("unknown account status: {0}")]
    UnknownAccountStatus(String),
}

/// Normalised email address used as the identity key.
///
/// ## Invariants
/// - Surrounding whitespace is removed and the address is lowercased.
/// - Exactly one `@` separates a non-empty local part from a non-empty domain.
/// - At most [`EMAIL_MAX_CHARS`] characters.
///
/// # Examples
/// ```
/// use donation_backend::domain::Email;
///
/// let email = Email::new("  Alice@Example.org ").expect("valid email");
/// assert_eq!(email.as_ref(), "alice@example.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let actual = normalised.chars().count();
        if actual > EMAIL_MAX_CHARS {
            return Err(UserValidationError::EmailTooLong {
                max: EMAIL_MAX_CHARS,
                actual,
            });
        }
        let mut parts = normalised.split('@');
        let valid = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(local), Some(domain), None)
                if !local.is_empty() && !domain.is_empty() && !normalised.contains(char::is_whitespace)
        );
        if !valid {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role recorded for a user in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default role for registered users.
    Donor,
    /// Staff helping coordinate requests.
    Volunteer,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Stable lowercase label used in storage and JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Volunteer => "volunteer",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Self::Donor),
            "volunteer" => Ok(Self::Volunteer),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a directory account may act on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Normal account.
    Active,
    /// Account suspended by an administrator.
    Blocked,
}

impl AccountStatus {
    /// Stable lowercase label used in storage and JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blocked => "blocked",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "blocked" => Ok(Self::Blocked),
            other => Err(UserValidationError::UnknownAccountStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role and status of one directory account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Directory key.
    pub email: Email,
    /// Role granted to the account.
    pub role: Role,
    /// Whether the account is active or blocked.
    pub status: AccountStatus,
}

/// Authenticated identity as asserted by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    email: Email,
}

impl Identity {
    /// Wrap a verified email claim.
    pub fn new(email: Email) -> Self {
        Self { email }
    }

    /// Email claim of the caller.
    pub fn email(&self) -> &Email {
        &self.email
    }
}

/// Caller resolved against the directory.
///
/// An actor without a directory entry is treated as a plain authenticated
/// user: never an admin, and unable to create requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    email: Email,
    entry: Option<DirectoryEntry>,
}

impl Actor {
    /// Combine an identity with its (optional) directory entry.
    pub fn new(identity: Identity, entry: Option<DirectoryEntry>) -> Self {
        Self {
            email: identity.email,
            entry,
        }
    }

    /// Caller email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Directory entry if the caller is registered.
    pub fn entry(&self) -> Option<&DirectoryEntry> {
        self.entry.as_ref()
    }

    /// Whether the directory grants the admin role.
    pub fn is_admin(&self) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| entry.role == Role::Admin)
    }

    /// Whether this actor is the given email.
    pub fn is(&self, email: &Email) -> bool {
        &self.email == email
    }
}
