//! Outbound port for movement persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::diary::DiaryNumber;
use crate::domain::movement::{Movement, MovementAction};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by movement repository adapters.
    pub enum MovementRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "movement repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "movement repository query failed: {message}",
    }
}

/// Input for appending a movement.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovementRecord {
    /// Pre-generated identifier.
    pub id: Uuid,
    /// Owning diary.
    pub diary_id: Uuid,
    /// Register number copied from the diary.
    pub number: DiaryNumber,
    /// Office the diary came from; may be blank.
    pub from_office: String,
    /// Destination office.
    pub to_office: String,
    /// Action performed.
    pub action: MovementAction,
    /// When the action happened.
    pub action_at: DateTime<Utc>,
    /// Free remarks.
    pub remarks: String,
    /// Recording operator.
    pub created_by: UserId,
}

/// Port for movement storage and retrieval.
///
/// Listings are always ordered by `action_at` then insertion order; the last
/// entry is the diary's current position.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovementRepository: Send + Sync {
    /// Append a movement.
    async fn append(&self, record: NewMovementRecord) -> Result<Movement, MovementRepositoryError>;

    /// Full history of one diary, in history order.
    async fn list_for_diary(
        &self,
        diary_id: Uuid,
    ) -> Result<Vec<Movement>, MovementRepositoryError>;

    /// Most recent movement of one diary.
    async fn latest_for_diary(
        &self,
        diary_id: Uuid,
    ) -> Result<Option<Movement>, MovementRepositoryError>;

    /// Every movement of a register year, in history order.
    async fn list_for_year(&self, year: i32) -> Result<Vec<Movement>, MovementRepositoryError>;
}

/// Fixture repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMovementRepository;

#[async_trait]
impl MovementRepository for FixtureMovementRepository {
    async fn append(&self, record: NewMovementRecord) -> Result<Movement, MovementRepositoryError> {
        Ok(Movement {
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
    }

    async fn list_for_diary(
        &self,
        _diary_id: Uuid,
    ) -> Result<Vec<Movement>, MovementRepositoryError> {
        Ok(Vec::new())
    }

    async fn latest_for_diary(
        &self,
        _diary_id: Uuid,
    ) -> Result<Option<Movement>, MovementRepositoryError> {
        Ok(None)
    }

    async fn list_for_year(&self, _year: i32) -> Result<Vec<Movement>, MovementRepositoryError> {
        Ok(Vec::new())
    }
}
