//! PostgreSQL-backed `UserDirectory` reading the `users` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{AccountStatus, DirectoryEntry, Email, Role};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user directory port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: UserRow) -> Result<DirectoryEntry, UserDirectoryError> {
    let invalid = |err: crate::domain::UserValidationError| {
        UserDirectoryError::query(format!("stored user is invalid: {err}"))
    };
    Ok(DirectoryEntry {
        email: Email::new(&row.email).map_err(invalid)?,
        role: row.role.parse::<Role>().map_err(invalid)?,
        status: row.status.parse::<AccountStatus>().map_err(invalid)?,
    })
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn lookup(&self, email: &Email) -> Result<Option<DirectoryEntry>, UserDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserDirectoryError::connection))?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    UserDirectoryError::query,
                    UserDirectoryError::connection,
                )
            })?;

        row.map(row_to_entry).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Row mapping coverage.

    use rstest::rstest;

    use super::*;

    fn row(role: &str, status: &str) -> UserRow {
        UserRow {
            email: "root@x.org".to_owned(),
            role: role.to_owned(),
            status: status.to_owned(),
        }
    }

    #[rstest]
    fn known_labels_map_to_entry() {
        let entry = row_to_entry(row("admin", "blocked")).expect("row is valid");
        assert_eq!(entry.role, Role::Admin);
        assert_eq!(entry.status, AccountStatus::Blocked);
    }

    #[rstest]
    #[case("superuser", "active")]
    #[case("donor", "suspended")]
    fn unknown_labels_are_query_errors(#[case] role: &str, #[case] status: &str) {
        let err = row_to_entry(row(role, status)).expect_err("row is invalid");
        assert!(matches!(err, UserDirectoryError::Query { .. }));
    }
}
