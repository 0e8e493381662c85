//! Register listing, registration, detail, edit, and deletion handlers.
//!
//! ```text
//! GET    /api/v1/diaries?q=&year=&status=&cursor=
//! POST   /api/v1/diaries
//! GET    /api/v1/diaries/{id}
//! PUT    /api/v1/diaries/{id}
//! DELETE /api/v1/diaries/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{Cursor, Page};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::RegisterDiaryRequest;
use crate::domain::{
    Diary, DiaryAttributes, DiaryFilter, DocumentKind, Error, HistoryEntry, SearchTerm,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::movements::MovementResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_date, parse_label};

/// Diary representation returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaryResponse {
    /// Stable identifier.
    pub id: Uuid,
    /// Register number, `YYYY-SSSSSS`.
    #[schema(example = "2026-000012")]
    pub number: String,
    /// Register year.
    pub year: i32,
    /// Per-year sequence.
    pub sequence: u32,
    /// Register date (ISO).
    pub diary_date: String,
    /// Source office or sender.
    pub received_from: String,
    /// Sender's own reference.
    pub received_diary_no: String,
    /// Document kind label.
    pub kind: String,
    /// Folder count.
    pub folders: u32,
    /// Subject line.
    pub subject: String,
    /// Free remarks.
    pub remarks: String,
    /// Current holder office.
    pub marked_to: String,
    /// Date of the last movement (ISO).
    pub marked_date: Option<String>,
    /// Lifecycle status label.
    pub status: String,
    /// Registering operator.
    pub created_by: String,
    /// Registration timestamp (RFC 3339).
    pub created_at: String,
}

impl From<Diary> for DiaryResponse {
    fn from(diary: Diary) -> Self {
        Self {
            id: diary.id,
            number: diary.number.to_string(),
            year: diary.number.year(),
            sequence: diary.number.sequence(),
            diary_date: diary.diary_date.to_string(),
            received_from: diary.received_from,
            received_diary_no: diary.received_diary_no,
            kind: diary.kind.to_string(),
            folders: diary.folders,
            subject: diary.subject,
            remarks: diary.remarks,
            marked_to: diary.marked_to,
            marked_date: diary.marked_date.map(|date| date.to_string()),
            status: diary.status.to_string(),
            created_by: diary.created_by.to_string(),
            created_at: diary.created_at.to_rfc3339(),
        }
    }
}

/// Request payload shared by registration and edits.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaryPayload {
    /// Register year; registration only, defaults to the current year.
    pub year: Option<i32>,
    /// Register date (ISO); defaults to today on registration.
    pub diary_date: Option<String>,
    /// Source office or sender.
    pub received_from: Option<String>,
    /// Sender's own reference.
    pub received_diary_no: Option<String>,
    /// Document kind label.
    pub kind: Option<String>,
    /// Folder count; required for kinds that carry folders.
    pub folders: Option<u32>,
    /// Subject line.
    pub subject: Option<String>,
    /// Destination office noted on the entry.
    pub marked_to: Option<String>,
    /// Free remarks.
    pub remarks: Option<String>,
}

impl DiaryPayload {
    /// Validate the payload into domain attributes.
    ///
    /// `diary_date` falls back to today only when `default_today` is set
    /// (registration); edits must state the date they mean.
    fn into_attributes(self, default_today: bool) -> Result<(Option<i32>, DiaryAttributes), Error> {
        let kind: DocumentKind = parse_label(
            self.kind.as_deref().ok_or_else(|| missing_field_error("kind"))?,
            "kind",
            "one of file|letter|service_book|application",
        )?;
        let diary_date = match self.diary_date.as_deref() {
            Some(raw) => parse_date(raw, "diaryDate")?,
            None if default_today => chrono::Local::now().date_naive(),
            None => return Err(missing_field_error("diaryDate")),
        };
        let attributes = DiaryAttributes::validated(
            diary_date,
            self.received_from.unwrap_or_default(),
            self.received_diary_no.unwrap_or_default(),
            kind,
            self.folders,
            self.subject.unwrap_or_default(),
            self.marked_to.unwrap_or_default(),
            self.remarks.unwrap_or_default(),
        )
        .map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(serde_json::json!({
                "field": "folders",
                "code": "folder_rules",
            }))
        })?;
        Ok((self.year, attributes))
    }
}

/// Registration response: the diary plus its initial movement.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDiaryResponse {
    /// The stored diary.
    pub diary: DiaryResponse,
    /// The initial `created` movement.
    pub initial_movement: MovementResponse,
}

/// Detail response: the diary with its full movement history.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaryDetailResponse {
    /// The diary.
    pub diary: DiaryResponse,
    /// Movements in history order.
    pub movements: Vec<MovementResponse>,
    /// Structured register history.
    pub history: Vec<HistoryEntry>,
    /// Register-style plain rendering.
    pub history_plain: String,
}

/// Listing query parameters.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Free-text search: a register number, a bare sequence, or text.
    pub q: Option<String>,
    /// Restrict to a register year.
    pub year: Option<i32>,
    /// Restrict to a status label.
    pub status: Option<String>,
    /// Continuation cursor from a previous page.
    pub cursor: Option<String>,
}

impl ListQuery {
    fn into_filter_and_cursor(self) -> Result<(DiaryFilter, Cursor), Error> {
        let status = self
            .status
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(|value| parse_label(value, "status", "a diary status label"))
            .transpose()?;
        let cursor = match self.cursor.as_deref().filter(|value| !value.is_empty()) {
            Some(raw) => Cursor::decode(raw).map_err(|err| {
                Error::invalid_request("cursor is not valid").with_details(serde_json::json!({
                    "field": "cursor",
                    "code": "invalid_cursor",
                    "reason": err.to_string(),
                }))
            })?,
            None => Cursor::first(),
        };
        let filter = DiaryFilter {
            year: self.year,
            status,
            term: self.q.as_deref().and_then(SearchTerm::parse),
        };
        Ok((filter, cursor))
    }
}

/// List the register with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/diaries",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of the register"),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["diaries"],
    operation_id = "listDiaries"
)]
#[get("/diaries")]
pub async fn list_diaries(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<DiaryResponse>>> {
    session.require_user_id()?;
    let (filter, cursor) = query.into_inner().into_filter_and_cursor()?;
    let page = state.diaries.list(&filter, cursor).await?;
    Ok(web::Json(page.map(DiaryResponse::from)))
}

/// Register a diary under the next free number.
#[utoipa::path(
    post,
    path = "/api/v1/diaries",
    request_body = DiaryPayload,
    responses(
        (status = 201, description = "Diary registered", body = RegisteredDiaryResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Register contention", body = Error)
    ),
    tags = ["diaries"],
    operation_id = "registerDiary"
)]
#[post("/diaries")]
pub async fn create_diary(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DiaryPayload>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let (year, attributes) = payload.into_inner().into_attributes(true)?;
    let registered = state
        .register
        .register(RegisterDiaryRequest {
            year,
            attributes,
            created_by: user_id,
        })
        .await?;
    Ok(HttpResponse::Created().json(RegisteredDiaryResponse {
        diary: DiaryResponse::from(registered.diary),
        initial_movement: MovementResponse::from(registered.initial_movement),
    }))
}

/// Fetch one diary with its movement history.
#[utoipa::path(
    get,
    path = "/api/v1/diaries/{id}",
    params(("id" = Uuid, Path, description = "Diary identifier")),
    responses(
        (status = 200, description = "Diary detail", body = DiaryDetailResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such diary", body = Error)
    ),
    tags = ["diaries"],
    operation_id = "getDiary"
)]
#[get("/diaries/{id}")]
pub async fn get_diary(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<DiaryDetailResponse>> {
    session.require_user_id()?;
    let detail = state.diaries.fetch(path.into_inner()).await?;
    let history = crate::domain::movement_history(&detail.movements);
    Ok(web::Json(DiaryDetailResponse {
        diary: DiaryResponse::from(detail.diary),
        movements: detail.movements.into_iter().map(MovementResponse::from).collect(),
        history,
        history_plain: detail.history_plain,
    }))
}

/// Edit the descriptive fields of a diary.
#[utoipa::path(
    put,
    path = "/api/v1/diaries/{id}",
    params(("id" = Uuid, Path, description = "Diary identifier")),
    request_body = DiaryPayload,
    responses(
        (status = 200, description = "Updated diary", body = DiaryResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such diary", body = Error)
    ),
    tags = ["diaries"],
    operation_id = "updateDiary"
)]
#[put("/diaries/{id}")]
pub async fn update_diary(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<DiaryPayload>,
) -> ApiResult<web::Json<DiaryResponse>> {
    session.require_user_id()?;
    let (_, attributes) = payload.into_inner().into_attributes(false)?;
    let diary = state.register.update(path.into_inner(), attributes).await?;
    Ok(web::Json(DiaryResponse::from(diary)))
}

/// Delete a diary and its movements.
#[utoipa::path(
    delete,
    path = "/api/v1/diaries/{id}",
    params(("id" = Uuid, Path, description = "Diary identifier")),
    responses(
        (status = 204, description = "Diary deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such diary", body = Error)
    ),
    tags = ["diaries"],
    operation_id = "deleteDiary"
)]
#[delete("/diaries/{id}")]
pub async fn delete_diary(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    state.register.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn payload(kind: &str, folders: Option<u32>) -> DiaryPayload {
        DiaryPayload {
            year: None,
            diary_date: Some("2026-07-01".to_owned()),
            received_from: Some("Accounts".to_owned()),
            received_diary_no: None,
            kind: Some(kind.to_owned()),
            folders,
            subject: Some("Pension case".to_owned()),
            marked_to: None,
            remarks: None,
        }
    }

    #[rstest]
    fn payload_requires_a_kind() {
        let mut body = payload("letter", None);
        body.kind = None;
        let err = body.into_attributes(true).expect_err("missing kind");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn payload_applies_folder_rules() {
        let err = payload("file", None)
            .into_attributes(true)
            .expect_err("file needs folders");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);

        let (_, attributes) = payload("letter", Some(5))
            .into_attributes(true)
            .expect("letter ignores folders");
        assert_eq!(attributes.folders, 0);
    }

    #[rstest]
    fn registration_defaults_the_date_but_edits_do_not() {
        let mut body = payload("letter", None);
        body.diary_date = None;
        let (_, attributes) = payload_clone(&body).into_attributes(true).expect("defaulted");
        assert_eq!(attributes.diary_date, chrono::Local::now().date_naive());

        let err = body.into_attributes(false).expect_err("edit needs a date");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    fn payload_clone(body: &DiaryPayload) -> DiaryPayload {
        DiaryPayload {
            year: body.year,
            diary_date: body.diary_date.clone(),
            received_from: body.received_from.clone(),
            received_diary_no: body.received_diary_no.clone(),
            kind: body.kind.clone(),
            folders: body.folders,
            subject: body.subject.clone(),
            marked_to: body.marked_to.clone(),
            remarks: body.remarks.clone(),
        }
    }

    #[rstest]
    fn list_query_interprets_filters() {
        let query = ListQuery {
            q: Some("2026-12".to_owned()),
            year: Some(2026),
            status: Some("forwarded".to_owned()),
            cursor: None,
        };
        let (filter, cursor) = query.into_filter_and_cursor().expect("filter");
        assert!(matches!(filter.term, Some(SearchTerm::Number(_))));
        assert_eq!(filter.year, Some(2026));
        assert_eq!(cursor, Cursor::first());
    }

    #[rstest]
    fn list_query_rejects_bad_cursors_and_statuses() {
        let query = ListQuery {
            q: None,
            year: None,
            status: Some("teleported".to_owned()),
            cursor: None,
        };
        assert!(query.into_filter_and_cursor().is_err());

        let query = ListQuery {
            q: None,
            year: None,
            status: None,
            cursor: Some("!!!".to_owned()),
        };
        assert!(query.into_filter_and_cursor().is_err());
    }
}
