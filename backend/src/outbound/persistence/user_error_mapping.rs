//! Diesel and pool error mapping for the user repository.
//!
//! The unique-violation kind is the only signal used to detect a taken
//! email; callers receive [`UserPersistenceError::Conflict`] and never look
//! at driver codes themselves.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::UserPersistenceError;

use super::pool::PoolError;

pub(super) fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

pub(super) fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unique constraint");
            UserPersistenceError::conflict(constraint)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::not_found("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct Info {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { constraint }))
    }

    #[rstest]
    fn unique_violation_maps_to_conflict() {
        let mapped = map_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("users_email_key"),
        ));
        assert_eq!(mapped, UserPersistenceError::conflict("users_email_key"));
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection, None), "connection")]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation, None), "query")]
    #[case(DieselError::NotFound, "not_found")]
    #[case(DieselError::RollbackTransaction, "query")]
    fn other_failures_keep_their_category(#[case] error: DieselError, #[case] expected: &str) {
        let category = match map_diesel_error(error) {
            UserPersistenceError::Conflict { .. } => "conflict",
            UserPersistenceError::NotFound { .. } => "not_found",
            UserPersistenceError::Connection { .. } => "connection",
            UserPersistenceError::Query { .. } => "query",
        };
        assert_eq!(category, expected);
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, UserPersistenceError::connection("timed out"));
    }
}
