//! Port for the external user directory.
//!
//! The directory is read-only to the donation core: it only answers which
//! role and account status belong to an email address.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{DirectoryEntry, Email};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Port for resolving a caller's role and account status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up the directory entry for `email`.
    async fn lookup(&self, email: &Email) -> Result<Option<DirectoryEntry>, UserDirectoryError>;
}

/// Fixture directory backed by a fixed map of entries.
#[derive(Debug, Default, Clone)]
pub struct FixtureUserDirectory {
    entries: HashMap<Email, DirectoryEntry>,
}

impl FixtureUserDirectory {
    /// Build a fixture directory from a list of entries.
    pub fn with_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.email.clone(), entry))
                .collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn lookup(&self, email: &Email) -> Result<Option<DirectoryEntry>, UserDirectoryError> {
        Ok(self.entries.get(email).cloned())
    }
}
