//! PostgreSQL-backed [`DiaryRepository`] using Diesel.
//!
//! Number allocation runs in a transaction that locks the year's newest row
//! before computing `MAX(sequence) + 1`. Postgres disallows `FOR UPDATE`
//! with aggregates, so the lock targets the top row instead; the unique
//! constraint catches the remaining first-row-of-a-year race and the
//! operation retries a bounded number of times.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::Cursor;
use uuid::Uuid;

use crate::domain::ports::{
    DiaryRepository, DiaryRepositoryError, NewDiaryRecord, PositionUpdate,
};
use crate::domain::{Diary, DiaryStatus, SearchTerm};
use crate::domain::search::DiaryFilter;

use super::error_mapping::{
    StorageFailure, classify_diesel_error, classify_pool_error, is_unique_violation,
};
use super::models::{
    DiaryAttributesUpdate, DiaryPositionUpdate, DiaryRow, NewDiaryRow, folders_for_db,
    sequence_for_db,
};
use super::pool::DbPool;
use super::schema::diaries;

/// How often to retry sequence allocation when concurrent registrations
/// collide on the unique constraint.
const ALLOCATION_ATTEMPTS: u32 = 3;

/// Diesel-backed implementation of the [`DiaryRepository`] port.
#[derive(Clone)]
pub struct DieselDiaryRepository {
    pool: DbPool,
}

impl DieselDiaryRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StorageFailure) -> DiaryRepositoryError {
    failure.into_port_error(
        DiaryRepositoryError::connection,
        DiaryRepositoryError::query,
    )
}

fn map_pool(error: super::pool::PoolError) -> DiaryRepositoryError {
    map_failure(classify_pool_error(error))
}

fn map_diesel(error: diesel::result::Error) -> DiaryRepositoryError {
    map_failure(classify_diesel_error(error))
}

/// Escape LIKE metacharacters and wrap the term for substring matching.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Apply the register filter to a boxed diaries query.
fn filtered(filter: &DiaryFilter) -> diaries::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = diaries::table.into_boxed();
    if let Some(year) = filter.year {
        query = query.filter(diaries::year.eq(year));
    }
    if let Some(status) = filter.status {
        query = query.filter(diaries::status.eq(status.as_str()));
    }
    match &filter.term {
        Some(SearchTerm::Number(number)) => {
            query = query.filter(
                diaries::year
                    .eq(number.year())
                    .and(diaries::sequence.eq(sequence_for_db(number.sequence()))),
            );
        }
        Some(SearchTerm::Sequence(sequence)) => {
            query = query.filter(diaries::sequence.eq(sequence_for_db(*sequence)));
        }
        Some(SearchTerm::Text(text)) => {
            let pattern = like_pattern(text);
            query = query.filter(
                diaries::subject
                    .ilike(pattern.clone())
                    .or(diaries::received_from.ilike(pattern.clone()))
                    .or(diaries::received_diary_no.ilike(pattern.clone()))
                    .or(diaries::kind.ilike(pattern.clone()))
                    .or(diaries::marked_to.ilike(pattern.clone()))
                    .or(diaries::remarks.ilike(pattern)),
            );
        }
        None => {}
    }
    query
}

#[async_trait]
impl DiaryRepository for DieselDiaryRepository {
    async fn create_with_next_sequence(
        &self,
        record: NewDiaryRecord,
    ) -> Result<Diary, DiaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let record = &record;

        for _ in 0..ALLOCATION_ATTEMPTS {
            let result = conn
                .transaction::<DiaryRow, diesel::result::Error, _>(|conn| {
                    async move {
                        let last: Option<i32> = diaries::table
                            .filter(diaries::year.eq(record.year))
                            .order(diaries::sequence.desc())
                            .select(diaries::sequence)
                            .limit(1)
                            .for_update()
                            .first(conn)
                            .await
                            .optional()?;
                        let next = last.unwrap_or(0).saturating_add(1);

                        let row = NewDiaryRow {
                            id: record.id,
                            year: record.year,
                            sequence: next,
                            diary_date: record.attributes.diary_date,
                            received_from: &record.attributes.received_from,
                            received_diary_no: &record.attributes.received_diary_no,
                            kind: record.attributes.kind.as_str(),
                            folders: folders_for_db(record.attributes.folders),
                            subject: &record.attributes.subject,
                            remarks: &record.attributes.remarks,
                            marked_to: &record.attributes.marked_to,
                            status: record.status.as_str(),
                            created_by: *record.created_by.as_uuid(),
                            created_at: record.created_at,
                        };
                        diesel::insert_into(diaries::table)
                            .values(&row)
                            .get_result::<DiaryRow>(conn)
                            .await
                    }
                    .scope_boxed()
                })
                .await;

            match result {
                Ok(row) => return Ok(row.into_domain()),
                Err(err) if is_unique_violation(&err) => {}
                Err(err) => return Err(map_diesel(err)),
            }
        }
        Err(DiaryRepositoryError::allocation_contended(record.year))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Diary>, DiaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<DiaryRow> = diaries::table
            .find(id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(DiaryRow::into_domain))
    }

    async fn update_attributes(
        &self,
        id: Uuid,
        attributes: crate::domain::DiaryAttributes,
    ) -> Result<Option<Diary>, DiaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let changeset = DiaryAttributesUpdate {
            diary_date: attributes.diary_date,
            received_from: &attributes.received_from,
            received_diary_no: &attributes.received_diary_no,
            kind: attributes.kind.as_str(),
            folders: folders_for_db(attributes.folders),
            subject: &attributes.subject,
            marked_to: &attributes.marked_to,
            remarks: &attributes.remarks,
        };
        let row: Option<DiaryRow> = diesel::update(diaries::table.find(id))
            .set(&changeset)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(DiaryRow::into_domain))
    }

    async fn update_position(
        &self,
        id: Uuid,
        position: PositionUpdate,
    ) -> Result<bool, DiaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let changeset = DiaryPositionUpdate {
            marked_to: &position.marked_to,
            marked_date: position.marked_date,
            status: position.status.as_str(),
        };
        let updated = diesel::update(diaries::table.find(id))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DiaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let deleted = diesel::delete(diaries::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(deleted > 0)
    }

    async fn search(
        &self,
        filter: &DiaryFilter,
        cursor: Cursor,
        page_size: u32,
    ) -> Result<(Vec<Diary>, u64), DiaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        let offset = i64::try_from(cursor.offset(page_size)).unwrap_or(i64::MAX);
        let rows: Vec<DiaryRow> = filtered(filter)
            .order((diaries::year.desc(), diaries::sequence.asc()))
            .limit(i64::from(page_size))
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        let diaries = rows.into_iter().map(DiaryRow::into_domain).collect();
        Ok((diaries, u64::try_from(total).unwrap_or(0)))
    }

    async fn list_year(&self, year: i32) -> Result<Vec<Diary>, DiaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<DiaryRow> = diaries::table
            .filter(diaries::year.eq(year))
            .order(diaries::sequence.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(DiaryRow::into_domain).collect())
    }

    async fn status_counts(
        &self,
        year: i32,
    ) -> Result<Vec<(DiaryStatus, u64)>, DiaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<(String, i64)> = diaries::table
            .filter(diaries::year.eq(year))
            .group_by(diaries::status)
            .select((diaries::status, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows
            .into_iter()
            .filter_map(|(label, count)| {
                let status: DiaryStatus = label.parse().ok()?;
                Some((status, u64::try_from(count).unwrap_or(0)))
            })
            .collect())
    }
}
