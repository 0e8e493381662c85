//! Shared classification of storage failures.
//!
//! Each repository port carries its own error enum; this module reduces
//! pool and Diesel failures to a connection/query split once so adapters
//! only translate the result.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to the split every port error distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StorageFailure {
    /// The backing database could not be reached.
    Connection(String),
    /// The statement itself failed.
    Query(String),
}

impl StorageFailure {
    /// Translate into a port error via the given constructors.
    pub(crate) fn into_port_error<E>(
        self,
        connection: impl FnOnce(String) -> E,
        query: impl FnOnce(String) -> E,
    ) -> E {
        match self {
            Self::Connection(message) => connection(message),
            Self::Query(message) => query(message),
        }
    }
}

/// Pool failures always mean the database is unreachable.
pub(crate) fn classify_pool_error(error: PoolError) -> StorageFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StorageFailure::Connection(message)
        }
    }
}

/// Reduce a Diesel error, logging the raw detail at debug level; clients
/// only ever see the generic description.
pub(crate) fn classify_diesel_error(error: DieselError) -> StorageFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => StorageFailure::Query("record not found".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StorageFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(_, _) => StorageFailure::Query("database error".to_owned()),
        _ => StorageFailure::Query("database query error".to_owned()),
    }
}

/// Whether the error is a unique-constraint violation, used by the sequence
/// allocator to detect races.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}
