//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every REST path and schema. Swagger UI serves the
//! document in debug builds; `cargo run --bin openapi-dump` exports it for
//! external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, HistoryEntry};
use crate::domain::report::{DashboardSummary, StatusCount, YearReport, YearReportRow};
use crate::inbound::http::auth::{LoginRequest, PasswordChangeRequest};
use crate::inbound::http::diaries::{
    DiaryDetailResponse, DiaryPayload, DiaryResponse, RegisteredDiaryResponse,
};
use crate::inbound::http::movements::{
    MovementPayload, MovementRecordedResponse, MovementResponse,
};
use crate::inbound::http::offices::OfficeResponse;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the diary register API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Diary register API",
        description = "Session-authenticated register of diaries, their movements between offices, and reports."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::change_password,
        crate::inbound::http::diaries::list_diaries,
        crate::inbound::http::diaries::create_diary,
        crate::inbound::http::diaries::get_diary,
        crate::inbound::http::diaries::update_diary,
        crate::inbound::http::diaries::delete_diary,
        crate::inbound::http::movements::record_movement,
        crate::inbound::http::offices::list_offices,
        crate::inbound::http::reports::year_report,
        crate::inbound::http::reports::year_report_csv,
        crate::inbound::http::reports::year_report_pdf,
        crate::inbound::http::reports::dashboard,
        crate::inbound::http::reports::dashboard_year,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        HistoryEntry,
        LoginRequest,
        PasswordChangeRequest,
        DiaryPayload,
        DiaryResponse,
        DiaryDetailResponse,
        RegisteredDiaryResponse,
        MovementPayload,
        MovementResponse,
        MovementRecordedResponse,
        OfficeResponse,
        YearReport,
        YearReportRow,
        DashboardSummary,
        StatusCount,
    )),
    tags(
        (name = "auth", description = "Sessions and credentials"),
        (name = "diaries", description = "Register entries"),
        (name = "movements", description = "Diary movements"),
        (name = "offices", description = "Office directory"),
        (name = "reports", description = "Registers, exports, dashboard"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_contains_every_register_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/login",
            "/api/v1/diaries",
            "/api/v1/diaries/{id}",
            "/api/v1/diaries/{id}/movements",
            "/api/v1/offices",
            "/api/v1/reports/years/{year}",
            "/api/v1/reports/years/{year}/csv",
            "/api/v1/reports/years/{year}/pdf",
            "/api/v1/dashboard/{year}",
            "/health/ready",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path: {path}"
            );
        }
    }

    #[test]
    fn document_serialises_to_json() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("serialise document");
        assert!(json.contains("Diary register API"));
    }
}
