//! Movement recording service.
//!
//! Implements [`MovementRecorder`]: origin defaulting, timestamp
//! defaulting, the diary position snapshot, and office directory upkeep.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Timelike;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::office::OfficeName;
use crate::domain::ports::{
    DiaryRepository, MovementRecorded, MovementRecorder, MovementRepository, NewMovementRecord,
    OfficeRepository, PositionUpdate, RecordMovementRequest,
};
use crate::domain::registration::{
    map_diary_repository_error, map_movement_repository_error, map_office_repository_error,
};

/// Movement service over the persistence ports.
#[derive(Clone)]
pub struct MovementLogService<D, M, O> {
    diaries: Arc<D>,
    movements: Arc<M>,
    offices: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<D, M, O> MovementLogService<D, M, O> {
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

fn missing_to_office() -> Error {
    Error::invalid_request("to office is required").with_details(json!({
        "field": "toOffice",
        "code": "missing_field",
    }))
}

#[async_trait]
impl<D, M, O> MovementRecorder for MovementLogService<D, M, O>
where
    D: DiaryRepository,
    M: MovementRepository,
    O: OfficeRepository,
{
    async fn record(&self, request: RecordMovementRequest) -> Result<MovementRecorded, Error> {
        let mut diary = self
            .diaries
            .find(request.diary_id)
            .await
            .map_err(map_diary_repository_error)?
            .ok_or_else(|| Error::not_found("diary not found"))?;

        let to_office =
            OfficeName::new(request.to_office.clone()).map_err(|_| missing_to_office())?;

        // Origin falls back along the same chain the register form offers:
        // last destination, then the diary's source, then the registry.
        let from_office = match request
            .from_office
            .as_deref()
            .and_then(OfficeName::from_record_field)
        {
            Some(name) => name,
            None => {
                let last = self
                    .movements
                    .latest_for_diary(diary.id)
                    .await
                    .map_err(map_movement_repository_error)?;
                last.and_then(|movement| OfficeName::from_record_field(&movement.to_office))
                    .or_else(|| OfficeName::from_record_field(&diary.received_from))
                    .unwrap_or_else(OfficeName::registry)
            }
        };

        // A defaulted timestamp is truncated to the minute, as the register
        // form pre-fills it.
        let action_at = match request.action_at {
            Some(at) => at,
            None => {
                let now = self.clock.utc();
                now.with_second(0)
                    .and_then(|t| t.with_nanosecond(0))
                    .unwrap_or(now)
            }
        };

        let movement = self
            .movements
            .append(NewMovementRecord {
                id: Uuid::new_v4(),
                diary_id: diary.id,
                number: diary.number,
                from_office: from_office.as_ref().to_owned(),
                to_office: to_office.as_ref().to_owned(),
                action: request.action,
                action_at,
                remarks: request.remarks,
                created_by: request.created_by,
            })
            .await
            .map_err(map_movement_repository_error)?;

        let position = PositionUpdate {
            marked_to: to_office.as_ref().to_owned(),
            marked_date: action_at.date_naive(),
            status: request.action.into(),
        };
        let found = self
            .diaries
            .update_position(diary.id, position.clone())
            .await
            .map_err(map_diary_repository_error)?;
        if !found {
            return Err(Error::not_found("diary not found"));
        }
        diary.marked_to = position.marked_to;
        diary.marked_date = Some(position.marked_date);
        diary.status = position.status;

        for name in [&from_office, &to_office] {
            self.offices
                .record(name)
                .await
                .map_err(map_office_repository_error)?;
        }

        info!(number = %diary.number, action = %movement.action, to = %movement.to_office, "movement recorded");
        Ok(MovementRecorded { movement, diary })
    }
}
