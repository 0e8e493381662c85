//! PostgreSQL-backed [`OfficeRepository`] using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{OfficeRepository, OfficeRepositoryError};
use crate::domain::{Office, OfficeName};

use super::error_mapping::{StorageFailure, classify_diesel_error, classify_pool_error};
use super::models::{NewOfficeRow, OfficeRow};
use super::pool::DbPool;
use super::schema::offices;

/// Diesel-backed implementation of the [`OfficeRepository`] port.
#[derive(Clone)]
pub struct DieselOfficeRepository {
    pool: DbPool,
}

impl DieselOfficeRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StorageFailure) -> OfficeRepositoryError {
    failure.into_port_error(
        OfficeRepositoryError::connection,
        OfficeRepositoryError::query,
    )
}

fn map_pool(error: super::pool::PoolError) -> OfficeRepositoryError {
    map_failure(classify_pool_error(error))
}

fn map_diesel(error: diesel::result::Error) -> OfficeRepositoryError {
    map_failure(classify_diesel_error(error))
}

#[async_trait]
impl OfficeRepository for DieselOfficeRepository {
    async fn record(&self, name: &OfficeName) -> Result<(), OfficeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NewOfficeRow {
            id: Uuid::new_v4(),
            name: name.as_ref(),
        };
        diesel::insert_into(offices::table)
            .values(&row)
            .on_conflict(offices::name)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn list(&self) -> Result<Vec<Office>, OfficeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<OfficeRow> = offices::table
            .order(offices::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().filter_map(OfficeRow::into_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_variant() {
        let err = map_pool(super::super::pool::PoolError::checkout("refused"));
        assert!(matches!(err, OfficeRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn diesel_errors_map_to_query_variant() {
        let err = map_diesel(diesel::result::Error::NotFound);
        assert!(matches!(err, OfficeRepositoryError::Query { .. }));
    }
}
