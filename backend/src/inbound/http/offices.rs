//! Office directory handler.
//!
//! ```text
//! GET /api/v1/offices
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Office};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Directory entry representation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficeResponse {
    /// Stable identifier.
    pub id: Uuid,
    /// Office name.
    pub name: String,
    /// First appearance timestamp (RFC 3339).
    pub created_at: String,
}

impl From<Office> for OfficeResponse {
    fn from(office: Office) -> Self {
        Self {
            id: office.id,
            name: office.name.to_string(),
            created_at: office.created_at.to_rfc3339(),
        }
    }
}

/// List the office directory alphabetically.
#[utoipa::path(
    get,
    path = "/api/v1/offices",
    responses(
        (status = 200, description = "Office directory", body = [OfficeResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["offices"],
    operation_id = "listOffices"
)]
#[get("/offices")]
pub async fn list_offices(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<OfficeResponse>>> {
    session.require_user_id()?;
    let offices = state.offices.directory().await?;
    Ok(web::Json(
        offices.into_iter().map(OfficeResponse::from).collect(),
    ))
}
