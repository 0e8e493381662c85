//! Driving port for diary registration and upkeep.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::diary::{Diary, DiaryAttributes, DiaryNumber, DiaryStatus};
use crate::domain::error::Error;
use crate::domain::movement::{Movement, MovementAction};
use crate::domain::user::UserId;

/// Request to register a diary.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterDiaryRequest {
    /// Register year; defaults to the current year when absent.
    pub year: Option<i32>,
    /// Validated descriptive fields.
    pub attributes: DiaryAttributes,
    /// Registering operator.
    pub created_by: UserId,
}

/// Result of a registration: the stored diary and its initial movement.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredDiary {
    /// The stored diary, status already advanced to `created`.
    pub diary: Diary,
    /// The initial `created` movement.
    pub initial_movement: Movement,
}

/// Domain use-case port for registering, editing, and removing diaries.
#[async_trait]
pub trait DiaryRegister: Send + Sync {
    /// Register a diary under the next free number of its year.
    async fn register(&self, request: RegisterDiaryRequest) -> Result<RegisteredDiary, Error>;

    /// Replace the descriptive fields of an existing diary.
    async fn update(&self, id: Uuid, attributes: DiaryAttributes) -> Result<Diary, Error>;

    /// Delete a diary and its movements.
    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}

/// Fixture register used until a database is configured.
///
/// Registrations echo a diary numbered 1; updates and deletes report the
/// diary as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDiaryRegister;

#[async_trait]
impl DiaryRegister for FixtureDiaryRegister {
    async fn register(&self, request: RegisterDiaryRequest) -> Result<RegisteredDiary, Error> {
        let year = request.year.unwrap_or(2026);
        let number = DiaryNumber::new(year, 1)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let now = chrono::Utc::now();
        let diary = Diary {
            id: Uuid::new_v4(),
            number,
            diary_date: request.attributes.diary_date,
            received_from: request.attributes.received_from.clone(),
            received_diary_no: request.attributes.received_diary_no,
            kind: request.attributes.kind,
            folders: request.attributes.folders,
            subject: request.attributes.subject,
            remarks: request.attributes.remarks,
            marked_to: request.attributes.marked_to,
            marked_date: Some(now.date_naive()),
            status: DiaryStatus::Created,
            created_by: request.created_by.clone(),
            created_at: now,
        };
        let office = if request.attributes.received_from.is_empty() {
            crate::domain::office::REGISTRY_OFFICE.to_owned()
        } else {
            request.attributes.received_from
        };
        let initial_movement = Movement {
            id: Uuid::new_v4(),
            diary_id: diary.id,
            number,
            from_office: office.clone(),
            to_office: office,
            action: MovementAction::Created,
            action_at: now,
            remarks: "Initial diary created".to_owned(),
            created_by: request.created_by,
            created_on: now,
        };
        Ok(RegisteredDiary {
            diary,
            initial_movement,
        })
    }

    async fn update(&self, _id: Uuid, _attributes: DiaryAttributes) -> Result<Diary, Error> {
        Err(Error::not_found("diary not found"))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("diary not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diary::DocumentKind;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn fixture_registration_records_the_initial_movement() {
        let request = RegisterDiaryRequest {
            year: Some(2026),
            attributes: DiaryAttributes::validated(
                NaiveDate::from_ymd_opt(2026, 7, 1).expect("date"),
                String::new(),
                String::new(),
                DocumentKind::Letter,
                None,
                "Subject".to_owned(),
                String::new(),
                String::new(),
            )
            .expect("attributes"),
            created_by: UserId::random(),
        };
        let registered = FixtureDiaryRegister
            .register(request)
            .await
            .expect("register");
        assert_eq!(registered.diary.status, DiaryStatus::Created);
        assert_eq!(registered.initial_movement.from_office, "Registry");
        assert_eq!(registered.initial_movement.to_office, "Registry");
        assert_eq!(
            registered.initial_movement.remarks,
            "Initial diary created"
        );
    }
}
