//! PostgreSQL-backed [`MovementRepository`] using Diesel.
//!
//! Histories are ordered by `action_at` with `created_on` as the tie-break,
//! which matches the order movements were recorded in.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::Movement;
use crate::domain::ports::{
    MovementRepository, MovementRepositoryError, NewMovementRecord,
};

use super::error_mapping::{StorageFailure, classify_diesel_error, classify_pool_error};
use super::models::{MovementRow, NewMovementRow, sequence_for_db};
use super::pool::DbPool;
use super::schema::diary_movements;

/// Diesel-backed implementation of the [`MovementRepository`] port.
#[derive(Clone)]
pub struct DieselMovementRepository {
    pool: DbPool,
}

impl DieselMovementRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StorageFailure) -> MovementRepositoryError {
    failure.into_port_error(
        MovementRepositoryError::connection,
        MovementRepositoryError::query,
    )
}

fn map_pool(error: super::pool::PoolError) -> MovementRepositoryError {
    map_failure(classify_pool_error(error))
}

fn map_diesel(error: diesel::result::Error) -> MovementRepositoryError {
    map_failure(classify_diesel_error(error))
}

#[async_trait]
impl MovementRepository for DieselMovementRepository {
    async fn append(&self, record: NewMovementRecord) -> Result<Movement, MovementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NewMovementRow {
            id: record.id,
            diary_id: record.diary_id,
            year: record.number.year(),
            sequence: sequence_for_db(record.number.sequence()),
            from_office: &record.from_office,
            to_office: &record.to_office,
            action: record.action.as_str(),
            action_at: record.action_at,
            remarks: &record.remarks,
            created_by: *record.created_by.as_uuid(),
        };
        let stored: MovementRow = diesel::insert_into(diary_movements::table)
            .values(&row)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(stored.into_domain())
    }

    async fn list_for_diary(
        &self,
        diary_id: Uuid,
    ) -> Result<Vec<Movement>, MovementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<MovementRow> = diary_movements::table
            .filter(diary_movements::diary_id.eq(diary_id))
            .order((
                diary_movements::action_at.asc(),
                diary_movements::created_on.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(MovementRow::into_domain).collect())
    }

    async fn latest_for_diary(
        &self,
        diary_id: Uuid,
    ) -> Result<Option<Movement>, MovementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<MovementRow> = diary_movements::table
            .filter(diary_movements::diary_id.eq(diary_id))
            .order((
                diary_movements::action_at.desc(),
                diary_movements::created_on.desc(),
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(MovementRow::into_domain))
    }

    async fn list_for_year(&self, year: i32) -> Result<Vec<Movement>, MovementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<MovementRow> = diary_movements::table
            .filter(diary_movements::year.eq(year))
            .order((
                diary_movements::sequence.asc(),
                diary_movements::action_at.asc(),
                diary_movements::created_on.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(MovementRow::into_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_variant() {
        let err = map_pool(super::super::pool::PoolError::checkout("refused"));
        assert!(matches!(err, MovementRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("refused"));
    }

    #[rstest]
    fn diesel_errors_map_to_query_variant() {
        let err = map_diesel(diesel::result::Error::NotFound);
        assert!(matches!(err, MovementRepositoryError::Query { .. }));
    }
}
