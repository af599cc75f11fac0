//! Resolution of authenticated identities into directory-backed actors.
//!
//! Role and account-status lookups happen in exactly one place so every
//! guard in the lifecycle manager sees the same view of the caller.

use std::sync::Arc;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{AccountStatus, Actor, DirectoryEntry, Error, Identity};

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::internal(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

/// Authorization capability injected into the lifecycle manager.
pub struct Authorizer<D> {
    directory: Arc<D>,
}

impl<D> Clone for Authorizer<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<D> Authorizer<D>
where
    D: UserDirectory,
{
    /// Wrap a user directory.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Attach the caller's directory entry, if any.
    pub async fn resolve(&self, identity: Identity) -> Result<Actor, Error> {
        let entry = self
            .directory
            .lookup(identity.email())
            .await
            .map_err(map_directory_error)?;
        Ok(Actor::new(identity, entry))
    }

    /// Resolve the caller and require an admin role.
    pub async fn require_admin(&self, identity: Identity) -> Result<Actor, Error> {
        let actor = self.resolve(identity).await?;
        if !actor.is_admin() {
            return Err(Error::forbidden("admin access required"));
        }
        Ok(actor)
    }

    /// Resolve the caller and require an active directory entry.
    pub async fn require_active(&self, identity: Identity) -> Result<Actor, Error> {
        let actor = self.resolve(identity).await?;
        match actor.entry() {
            None => Err(Error::not_found("requester account not found")),
            Some(DirectoryEntry {
                status: AccountStatus::Blocked,
                ..
            }) => Err(Error::account_blocked(
                "blocked accounts cannot create donation requests",
            )),
            Some(_) => Ok(actor),
        }
    }
}
