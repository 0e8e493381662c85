//! Movement records and the register-style history rendering.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::diary::{DiaryNumber, DiaryStatus, DiaryValidationError};
use super::user::UserId;

/// Action recorded by a movement. Each action doubles as the diary's new
/// status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MovementAction {
    /// Initial registration movement.
    Created,
    /// Marked to an office.
    Marked,
    /// Forwarded onwards.
    Forwarded,
    /// Returned to the registry.
    Returned,
    /// Closed.
    Closed,
    /// Disposed of.
    Disposed,
}

impl MovementAction {
    /// Database and API representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Marked => "marked",
            Self::Forwarded => "forwarded",
            Self::Returned => "returned",
            Self::Closed => "closed",
            Self::Disposed => "disposed",
        }
    }
}

impl fmt::Display for MovementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementAction {
    type Err = DiaryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "marked" => Ok(Self::Marked),
            "forwarded" => Ok(Self::Forwarded),
            "returned" => Ok(Self::Returned),
            "closed" => Ok(Self::Closed),
            "disposed" => Ok(Self::Disposed),
            other => Err(DiaryValidationError::UnknownLabel {
                input: other.to_owned(),
            }),
        }
    }
}

impl From<MovementAction> for DiaryStatus {
    fn from(action: MovementAction) -> Self {
        match action {
            MovementAction::Created => Self::Created,
            MovementAction::Marked => Self::Marked,
            MovementAction::Forwarded => Self::Forwarded,
            MovementAction::Returned => Self::Returned,
            MovementAction::Closed => Self::Closed,
            MovementAction::Disposed => Self::Disposed,
        }
    }
}

/// A recorded transfer of a diary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning diary.
    pub diary_id: Uuid,
    /// Denormalised register number, kept in sync with the diary.
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
    /// Row creation timestamp.
    pub created_on: DateTime<Utc>,
}

/// One entry of the register-style movement history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Destination office, or `-` when the movement named none.
    pub office: String,
    /// Day-month label as written in the physical register.
    pub date: String,
    /// Whether a later movement supersedes this one (rendered struck
    /// through in HTML contexts).
    pub superseded: bool,
}

impl HistoryEntry {
    /// Register label: office followed by the day-month.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.office, self.date)
    }
}

/// Build the register-style history from movements already ordered by
/// `action_at` then insertion order. Every entry but the last is superseded.
#[must_use]
pub fn movement_history(movements: &[Movement]) -> Vec<HistoryEntry> {
    let last = movements.len().saturating_sub(1);
    movements
        .iter()
        .enumerate()
        .map(|(index, movement)| {
            let office = if movement.to_office.is_empty() {
                "-".to_owned()
            } else {
                movement.to_office.clone()
            };
            HistoryEntry {
                office,
                date: movement.action_at.date_naive().format("%d-%m").to_string(),
                superseded: index != last,
            }
        })
        .collect()
}

/// Plain-text history: entries joined with `" / "`, `-` when empty.
#[must_use]
pub fn render_history_plain(movements: &[Movement]) -> String {
    if movements.is_empty() {
        return "-".to_owned();
    }
    movement_history(movements)
        .iter()
        .map(HistoryEntry::label)
        .collect::<Vec<_>>()
        .join(" / ")
}
