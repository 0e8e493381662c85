//! Diary registration service.
//!
//! Implements [`DiaryRegister`]: number allocation, the initial movement,
//! the status snapshot, and office directory upkeep happen here so every
//! inbound adapter gets identical semantics.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::diary::{Diary, DiaryAttributes, DiaryNumber, DiaryStatus};
use crate::domain::error::Error;
use crate::domain::movement::MovementAction;
use crate::domain::office::OfficeName;
use crate::domain::ports::{
    DiaryRegister, DiaryRepository, DiaryRepositoryError, MovementRepository,
    MovementRepositoryError, NewDiaryRecord, NewMovementRecord, OfficeRepository,
    OfficeRepositoryError, PositionUpdate, RegisterDiaryRequest, RegisteredDiary,
};

/// Remarks written on every initial movement.
pub const INITIAL_MOVEMENT_REMARKS: &str = "Initial diary created";

/// Registration service over the persistence ports.
#[derive(Clone)]
pub struct DiaryRegistrationService<D, M, O> {
    diaries: Arc<D>,
    movements: Arc<M>,
    offices: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<D, M, O> DiaryRegistrationService<D, M, O> {
    /// Create a new service with the given repositories and clock.
    pub fn new(diaries: Arc<D>, movements: Arc<M>, offices: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self {
            diaries,
            movements,
            offices,
            clock,
        }
    }
}

pub(crate) fn map_diary_repository_error(error: DiaryRepositoryError) -> Error {
    match error {
        DiaryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("diary repository unavailable: {message}"))
        }
        DiaryRepositoryError::Query { message } => {
            Error::internal(format!("diary repository error: {message}"))
        }
        DiaryRepositoryError::AllocationContended { year } => Error::conflict(format!(
            "register is busy; could not allocate a number for {year}"
        )),
    }
}

pub(crate) fn map_movement_repository_error(error: MovementRepositoryError) -> Error {
    match error {
        MovementRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("movement repository unavailable: {message}"))
        }
        MovementRepositoryError::Query { message } => {
            Error::internal(format!("movement repository error: {message}"))
        }
    }
}

pub(crate) fn map_office_repository_error(error: OfficeRepositoryError) -> Error {
    match error {
        OfficeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("office repository unavailable: {message}"))
        }
        OfficeRepositoryError::Query { message } => {
            Error::internal(format!("office repository error: {message}"))
        }
    }
}

impl<D, M, O> DiaryRegistrationService<D, M, O>
where
    D: DiaryRepository,
    M: MovementRepository,
    O: OfficeRepository,
{
    /// Fold any office names on the attributes into the directory.
    async fn record_offices(&self, attributes: &DiaryAttributes) -> Result<(), Error> {
        for raw in [&attributes.received_from, &attributes.marked_to] {
            if let Some(name) = OfficeName::from_record_field(raw) {
                self.offices
                    .record(&name)
                    .await
                    .map_err(map_office_repository_error)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<D, M, O> DiaryRegister for DiaryRegistrationService<D, M, O>
where
    D: DiaryRepository,
    M: MovementRepository,
    O: OfficeRepository,
{
    async fn register(&self, request: RegisterDiaryRequest) -> Result<RegisteredDiary, Error> {
        let year = request.year.unwrap_or_else(|| self.clock.local().year());
        // Validates the year range before touching the repository.
        DiaryNumber::new(year, 1).map_err(|err| Error::invalid_request(err.to_string()))?;

        let now = self.clock.utc();
        let record = NewDiaryRecord {
            id: Uuid::new_v4(),
            year,
            attributes: request.attributes.clone(),
            status: DiaryStatus::Pending,
            created_by: request.created_by.clone(),
            created_at: now,
        };
        let mut diary = self
            .diaries
            .create_with_next_sequence(record)
            .await
            .map_err(map_diary_repository_error)?;

        self.record_offices(&request.attributes).await?;

        let office = OfficeName::from_record_field(&diary.received_from)
            .unwrap_or_else(OfficeName::registry);
        let initial_movement = self
            .movements
            .append(NewMovementRecord {
                id: Uuid::new_v4(),
                diary_id: diary.id,
                number: diary.number,
                from_office: office.as_ref().to_owned(),
                to_office: office.as_ref().to_owned(),
                action: MovementAction::Created,
                action_at: now,
                remarks: INITIAL_MOVEMENT_REMARKS.to_owned(),
                created_by: request.created_by,
            })
            .await
            .map_err(map_movement_repository_error)?;

        let marked_date = self.clock.local().date_naive();
        self.diaries
            .update_position(
                diary.id,
                PositionUpdate {
                    marked_to: diary.marked_to.clone(),
                    marked_date,
                    status: DiaryStatus::Created,
                },
            )
            .await
            .map_err(map_diary_repository_error)?;
        diary.status = DiaryStatus::Created;
        diary.marked_date = Some(marked_date);

        info!(number = %diary.number, "diary registered");
        Ok(RegisteredDiary {
            diary,
            initial_movement,
        })
    }

    async fn update(&self, id: Uuid, attributes: DiaryAttributes) -> Result<Diary, Error> {
        self.record_offices(&attributes).await?;
        let updated = self
            .diaries
            .update_attributes(id, attributes)
            .await
            .map_err(map_diary_repository_error)?;
        updated.ok_or_else(|| Error::not_found("diary not found"))
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let deleted = self
            .diaries
            .delete(id)
            .await
            .map_err(map_diary_repository_error)?;
        if deleted {
            info!(diary = %id, "diary deleted");
            Ok(())
        } else {
            Err(Error::not_found("diary not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diary::DocumentKind;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::{
        MockDiaryRepository, MockMovementRepository, MockOfficeRepository,
    };
    use crate::domain::user::UserId;
    use chrono::NaiveDate;
    use mockable::DefaultClock;
    use rstest::rstest;

    fn attributes(received_from: &str) -> DiaryAttributes {
        DiaryAttributes::validated(
            NaiveDate::from_ymd_opt(2026, 7, 1).expect("date"),
            received_from.to_owned(),
            String::new(),
            DocumentKind::Letter,
            None,
            "Pension case".to_owned(),
            String::new(),
            String::new(),
        )
        .expect("attributes")
    }

    fn stored_diary(record: &NewDiaryRecord, sequence: u32) -> Diary {
        Diary {
            id: record.id,
            number: DiaryNumber::new(record.year, sequence).expect("number"),
            diary_date: record.attributes.diary_date,
            received_from: record.attributes.received_from.clone(),
            received_diary_no: record.attributes.received_diary_no.clone(),
            kind: record.attributes.kind,
            folders: record.attributes.folders,
            subject: record.attributes.subject.clone(),
            remarks: record.attributes.remarks.clone(),
            marked_to: record.attributes.marked_to.clone(),
            marked_date: None,
            status: record.status,
            created_by: record.created_by.clone(),
            created_at: record.created_at,
        }
    }

    fn service(
        diaries: MockDiaryRepository,
        movements: MockMovementRepository,
        offices: MockOfficeRepository,
    ) -> DiaryRegistrationService<MockDiaryRepository, MockMovementRepository, MockOfficeRepository>
    {
        DiaryRegistrationService::new(
            Arc::new(diaries),
            Arc::new(movements),
            Arc::new(offices),
            Arc::new(DefaultClock),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn register_records_initial_movement_and_advances_status() {
        let mut diaries = MockDiaryRepository::new();
        diaries
            .expect_create_with_next_sequence()
            .returning(|record| Ok(stored_diary(&record, 1)));
        diaries
            .expect_update_position()
            .withf(|_, position| {
                position.status == DiaryStatus::Created && position.marked_to.is_empty()
            })
            .returning(|_, _| Ok(true));

        let mut movements = MockMovementRepository::new();
        movements
            .expect_append()
            .withf(|record| {
                record.action == MovementAction::Created
                    && record.from_office == "Accounts"
                    && record.to_office == "Accounts"
                    && record.remarks == INITIAL_MOVEMENT_REMARKS
            })
            .returning(|record| {
                Ok(crate::domain::movement::Movement {
                    id: record.id,
                    diary_id: record.diary_id,
                    number: record.number,
                    from_office: record.from_office,
                    to_office: record.to_office,
                    action: record.action,
                    action_at: record.action_at,
                    remarks: record.remarks,
                    created_by: record.created_by,
                    created_on: record.action_at,
                })
            });

        let mut offices = MockOfficeRepository::new();
        offices
            .expect_record()
            .withf(|name| name.as_ref() == "Accounts")
            .returning(|_| Ok(()));

        let registered = service(diaries, movements, offices)
            .register(RegisterDiaryRequest {
                year: Some(2026),
                attributes: attributes("Accounts"),
                created_by: UserId::random(),
            })
            .await
            .expect("registration");

        assert_eq!(registered.diary.status, DiaryStatus::Created);
        assert!(registered.diary.marked_date.is_some());
        assert_eq!(registered.diary.number.to_string(), "2026-000001");
    }

    #[rstest]
    #[tokio::test]
    async fn register_without_source_falls_back_to_registry() {
        let mut diaries = MockDiaryRepository::new();
        diaries
            .expect_create_with_next_sequence()
            .returning(|record| Ok(stored_diary(&record, 7)));
        diaries.expect_update_position().returning(|_, _| Ok(true));

        let mut movements = MockMovementRepository::new();
        movements
            .expect_append()
            .withf(|record| record.from_office == "Registry" && record.to_office == "Registry")
            .returning(|record| {
                Ok(crate::domain::movement::Movement {
                    id: record.id,
                    diary_id: record.diary_id,
                    number: record.number,
                    from_office: record.from_office,
                    to_office: record.to_office,
                    action: record.action,
                    action_at: record.action_at,
                    remarks: record.remarks,
                    created_by: record.created_by,
                    created_on: record.action_at,
                })
            });

        let offices = MockOfficeRepository::new();

        let registered = service(diaries, movements, offices)
            .register(RegisterDiaryRequest {
                year: Some(2026),
                attributes: attributes(""),
                created_by: UserId::random(),
            })
            .await
            .expect("registration");
        assert_eq!(registered.initial_movement.to_office, "Registry");
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_implausible_years() {
        let service = service(
            MockDiaryRepository::new(),
            MockMovementRepository::new(),
            MockOfficeRepository::new(),
        );
        let err = service
            .register(RegisterDiaryRequest {
                year: Some(99),
                attributes: attributes("Accounts"),
                created_by: UserId::random(),
            })
            .await
            .expect_err("bad year");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn contended_allocation_surfaces_as_conflict() {
        let mut diaries = MockDiaryRepository::new();
        diaries
            .expect_create_with_next_sequence()
            .returning(|_| Err(DiaryRepositoryError::allocation_contended(2026)));

        let err = service(diaries, MockMovementRepository::new(), MockOfficeRepository::new())
            .register(RegisterDiaryRequest {
                year: Some(2026),
                attributes: attributes("Accounts"),
                created_by: UserId::random(),
            })
            .await
            .expect_err("contended");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_missing_diary_is_not_found() {
        let mut diaries = MockDiaryRepository::new();
        diaries.expect_delete().returning(|_| Ok(false));

        let err = service(diaries, MockMovementRepository::new(), MockOfficeRepository::new())
            .delete(Uuid::nil())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
