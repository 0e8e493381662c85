//! Movement recording handler.
//!
//! ```text
//! POST /api/v1/diaries/{id}/movements
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::RecordMovementRequest;
use crate::domain::{Error, Movement, MovementAction};
use crate::inbound::http::ApiResult;
use crate::inbound::http::diaries::DiaryResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_label, parse_optional_timestamp,
};

/// Movement representation returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementResponse {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning diary.
    pub diary_id: Uuid,
    /// Register number, `YYYY-SSSSSS`.
    pub number: String,
    /// Origin office.
    pub from_office: String,
    /// Destination office.
    pub to_office: String,
    /// Action label.
    pub action: String,
    /// When the action happened (RFC 3339).
    pub action_at: String,
    /// Free remarks.
    pub remarks: String,
    /// Recording operator.
    pub created_by: String,
    /// Row creation timestamp (RFC 3339).
    pub created_on: String,
}

impl From<Movement> for MovementResponse {
    fn from(movement: Movement) -> Self {
        Self {
            id: movement.id,
            diary_id: movement.diary_id,
            number: movement.number.to_string(),
            from_office: movement.from_office,
            to_office: movement.to_office,
            action: movement.action.to_string(),
            action_at: movement.action_at.to_rfc3339(),
            remarks: movement.remarks,
            created_by: movement.created_by.to_string(),
            created_on: movement.created_on.to_rfc3339(),
        }
    }
}

/// Request payload for recording a movement.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementPayload {
    /// Origin office; derived from the history when omitted.
    pub from_office: Option<String>,
    /// Destination office (required).
    pub to_office: Option<String>,
    /// Action label (required).
    pub action: Option<String>,
    /// When the action happened (RFC 3339); defaults to now.
    pub action_at: Option<String>,
    /// Free remarks.
    pub remarks: Option<String>,
}

/// Response after recording: the movement plus the refreshed diary.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementRecordedResponse {
    /// The stored movement.
    pub movement: MovementResponse,
    /// The diary with its updated position snapshot.
    pub diary: DiaryResponse,
}

/// Record a movement against a diary.
#[utoipa::path(
    post,
    path = "/api/v1/diaries/{id}/movements",
    params(("id" = Uuid, Path, description = "Diary identifier")),
    request_body = MovementPayload,
    responses(
        (status = 201, description = "Movement recorded", body = MovementRecordedResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such diary", body = Error)
    ),
    tags = ["movements"],
    operation_id = "recordMovement"
)]
#[post("/diaries/{id}/movements")]
pub async fn record_movement(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<MovementPayload>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();

    let to_office = body
        .to_office
        .ok_or_else(|| missing_field_error("toOffice"))?;
    let action: MovementAction = parse_label(
        body.action
            .as_deref()
            .ok_or_else(|| missing_field_error("action"))?,
        "action",
        "one of created|marked|forwarded|returned|closed|disposed",
    )?;
    let action_at = parse_optional_timestamp(body.action_at.as_deref(), "actionAt")?;

    let recorded = state
        .movements
        .record(RecordMovementRequest {
            diary_id: path.into_inner(),
            from_office: body.from_office,
            to_office,
            action,
            action_at,
            remarks: body.remarks.unwrap_or_default(),
            created_by: user_id,
        })
        .await?;

    Ok(HttpResponse::Created().json(MovementRecordedResponse {
        movement: MovementResponse::from(recorded.movement),
        diary: DiaryResponse::from(recorded.diary),
    }))
}
