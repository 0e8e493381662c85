//! Driving port for recording movements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::diary::Diary;
use crate::domain::error::Error;
use crate::domain::movement::{Movement, MovementAction};
use crate::domain::user::UserId;

/// Request to record a movement against a diary.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMovementRequest {
    /// The diary being moved.
    pub diary_id: Uuid,
    /// Origin office. When absent, the service derives it from the last
    /// movement, the diary's source, or the registry, in that order.
    pub from_office: Option<String>,
    /// Destination office; must be non-blank.
    pub to_office: String,
    /// Action performed.
    pub action: MovementAction,
    /// When the action happened; defaults to now at minute precision.
    pub action_at: Option<DateTime<Utc>>,
    /// Free remarks.
    pub remarks: String,
    /// Recording operator.
    pub created_by: UserId,
}

/// Result of recording a movement: the stored movement and the diary with
/// its refreshed position snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementRecorded {
    /// The stored movement.
    pub movement: Movement,
    /// The diary after the snapshot update.
    pub diary: Diary,
}

/// Domain use-case port for recording movements.
#[async_trait]
pub trait MovementRecorder: Send + Sync {
    /// Record a movement and update the diary's position snapshot.
    async fn record(&self, request: RecordMovementRequest) -> Result<MovementRecorded, Error>;
}

/// Fixture recorder used until a database is configured: every diary is
/// reported missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMovementRecorder;

#[async_trait]
impl MovementRecorder for FixtureMovementRecorder {
    async fn record(&self, _request: RecordMovementRequest) -> Result<MovementRecorded, Error> {
        Err(Error::not_found("diary not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;

    #[tokio::test]
    async fn fixture_reports_diaries_missing() {
        let request = RecordMovementRequest {
            diary_id: Uuid::nil(),
            from_office: None,
            to_office: "Audit".to_owned(),
            action: MovementAction::Marked,
            action_at: None,
            remarks: String::new(),
            created_by: UserId::random(),
        };
        let err = FixtureMovementRecorder
            .record(request)
            .await
            .expect_err("missing diary");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
