//! Outbound port for diary persistence.
//!
//! The repository owns number allocation: callers hand it a year and the
//! validated attributes, and it assigns the next free sequence atomically so
//! concurrent registrations never collide.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use pagination::Cursor;
use uuid::Uuid;

use crate::domain::diary::{Diary, DiaryAttributes, DiaryStatus};
use crate::domain::search::DiaryFilter;
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by diary repository adapters.
    pub enum DiaryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "diary repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "diary repository query failed: {message}",
        /// Sequence allocation kept colliding under concurrent writes.
        AllocationContended { year: i32 } =>
            "could not allocate a sequence for {year} after repeated conflicts",
    }
}

/// Input for registering a diary. The repository assigns the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiaryRecord {
    /// Pre-generated identifier.
    pub id: Uuid,
    /// Register year to allocate in.
    pub year: i32,
    /// Validated descriptive fields.
    pub attributes: DiaryAttributes,
    /// Initial status.
    pub status: DiaryStatus,
    /// Registering operator.
    pub created_by: UserId,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Snapshot update applied after a movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionUpdate {
    /// New holder office.
    pub marked_to: String,
    /// Date of the movement.
    pub marked_date: NaiveDate,
    /// Status mirroring the movement action.
    pub status: DiaryStatus,
}

/// Port for diary storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiaryRepository: Send + Sync {
    /// Insert a diary under the next free sequence of its year.
    async fn create_with_next_sequence(
        &self,
        record: NewDiaryRecord,
    ) -> Result<Diary, DiaryRepositoryError>;

    /// Fetch a diary by id.
    async fn find(&self, id: Uuid) -> Result<Option<Diary>, DiaryRepositoryError>;

    /// Replace the descriptive fields of a diary.
    ///
    /// Returns the refreshed diary, or `None` when it does not exist.
    async fn update_attributes(
        &self,
        id: Uuid,
        attributes: DiaryAttributes,
    ) -> Result<Option<Diary>, DiaryRepositoryError>;

    /// Apply a position snapshot. Returns `false` when the diary is gone.
    async fn update_position(
        &self,
        id: Uuid,
        position: PositionUpdate,
    ) -> Result<bool, DiaryRepositoryError>;

    /// Delete a diary (movements cascade). Returns `false` when absent.
    async fn delete(&self, id: Uuid) -> Result<bool, DiaryRepositoryError>;

    /// Filtered listing page: year descending, then sequence ascending.
    ///
    /// Returns the page of diaries plus the total match count.
    async fn search(
        &self,
        filter: &DiaryFilter,
        cursor: Cursor,
        page_size: u32,
    ) -> Result<(Vec<Diary>, u64), DiaryRepositoryError>;

    /// Every diary of a year, in sequence order.
    async fn list_year(&self, year: i32) -> Result<Vec<Diary>, DiaryRepositoryError>;

    /// Status histogram for a year.
    async fn status_counts(
        &self,
        year: i32,
    ) -> Result<Vec<(DiaryStatus, u64)>, DiaryRepositoryError>;
}

/// Fixture repository used when no database is configured.
///
/// Lookups find nothing and mutations are discarded; registrations echo a
/// diary numbered 1 so fixture-mode servers still respond coherently.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDiaryRepository;

#[async_trait]
impl DiaryRepository for FixtureDiaryRepository {
    async fn create_with_next_sequence(
        &self,
        record: NewDiaryRecord,
    ) -> Result<Diary, DiaryRepositoryError> {
        let number = crate::domain::diary::DiaryNumber::new(record.year, 1)
            .map_err(|err| DiaryRepositoryError::query(err.to_string()))?;
        Ok(Diary {
            id: record.id,
            number,
            diary_date: record.attributes.diary_date,
            received_from: record.attributes.received_from,
            received_diary_no: record.attributes.received_diary_no,
            kind: record.attributes.kind,
            folders: record.attributes.folders,
            subject: record.attributes.subject,
            remarks: record.attributes.remarks,
            marked_to: record.attributes.marked_to,
            marked_date: None,
            status: record.status,
            created_by: record.created_by,
            created_at: record.created_at,
        })
    }

    async fn find(&self, _id: Uuid) -> Result<Option<Diary>, DiaryRepositoryError> {
        Ok(None)
    }

    async fn update_attributes(
        &self,
        _id: Uuid,
        _attributes: DiaryAttributes,
    ) -> Result<Option<Diary>, DiaryRepositoryError> {
        Ok(None)
    }

    async fn update_position(
        &self,
        _id: Uuid,
        _position: PositionUpdate,
    ) -> Result<bool, DiaryRepositoryError> {
        Ok(true)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, DiaryRepositoryError> {
        Ok(false)
    }

    async fn search(
        &self,
        _filter: &DiaryFilter,
        _cursor: Cursor,
        _page_size: u32,
    ) -> Result<(Vec<Diary>, u64), DiaryRepositoryError> {
        Ok((Vec::new(), 0))
    }

    async fn list_year(&self, _year: i32) -> Result<Vec<Diary>, DiaryRepositoryError> {
        Ok(Vec::new())
    }

    async fn status_counts(
        &self,
        _year: i32,
    ) -> Result<Vec<(DiaryStatus, u64)>, DiaryRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diary::DocumentKind;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn record() -> NewDiaryRecord {
        NewDiaryRecord {
            id: Uuid::new_v4(),
            year: 2026,
            attributes: DiaryAttributes::validated(
                NaiveDate::from_ymd_opt(2026, 7, 1).expect("date"),
                "Accounts".to_owned(),
                String::new(),
                DocumentKind::Letter,
                None,
                "Subject".to_owned(),
                String::new(),
                String::new(),
            )
            .expect("attributes"),
            status: DiaryStatus::Pending,
            created_by: UserId::random(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn fixture_registration_numbers_from_one() {
        let repo = FixtureDiaryRepository;
        let diary = repo
            .create_with_next_sequence(record())
            .await
            .expect("fixture create");
        assert_eq!(diary.number.sequence(), 1);
        assert_eq!(diary.number.year(), 2026);
    }

    #[tokio::test]
    async fn fixture_lookups_find_nothing() {
        let repo = FixtureDiaryRepository;
        assert!(repo.find(Uuid::nil()).await.expect("find").is_none());
        let (items, total) = repo
            .search(&DiaryFilter::default(), Cursor::first(), 25)
            .await
            .expect("search");
        assert!(items.is_empty());
        assert_eq!(total, 0);
    }

    #[rstest]
    fn allocation_error_names_the_year() {
        let err = DiaryRepositoryError::allocation_contended(2026);
        assert!(err.to_string().contains("2026"));
    }
}
