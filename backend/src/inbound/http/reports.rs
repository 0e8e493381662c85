//! Year register reports and the dashboard.
//!
//! ```text
//! GET /api/v1/reports/years/{year}
//! GET /api/v1/reports/years/{year}/csv
//! GET /api/v1/reports/years/{year}/pdf
//! GET /api/v1/dashboard
//! GET /api/v1/dashboard/{year}
//! ```

use actix_web::{HttpResponse, get, http::header, web};
use chrono::Datelike;

use crate::domain::report::{DashboardSummary, YearReport};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::reports_pdf::render_year_report_pdf;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Column headers of the register table, shared by CSV and PDF exports.
pub(crate) const REPORT_COLUMNS: [&str; 10] = [
    "Diary No",
    "Date",
    "Received From",
    "Reference",
    "Kind",
    "Folders",
    "Subject",
    "Marked To",
    "Status",
    "History",
];

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// Render the register as CSV with a header row.
pub(crate) fn render_year_report_csv(report: &YearReport) -> String {
    let mut out = String::new();
    out.push_str(&REPORT_COLUMNS.join(","));
    out.push_str("\r\n");
    for row in &report.rows {
        let fields = [
            row.number.to_string(),
            row.diary_date.to_string(),
            row.received_from.clone(),
            row.received_diary_no.clone(),
            row.kind.to_string(),
            row.folders.to_string(),
            row.subject.clone(),
            row.marked_to.clone(),
            row.status.to_string(),
            row.history_plain.clone(),
        ];
        let line: Vec<String> = fields.iter().map(|field| csv_field(field)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

fn attachment(filename: &str) -> (header::HeaderName, String) {
    (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{filename}\""),
    )
}

/// The year register as JSON.
#[utoipa::path(
    get,
    path = "/api/v1/reports/years/{year}",
    params(("year" = i32, Path, description = "Register year")),
    responses(
        (status = 200, description = "Year register", body = YearReport),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reports"],
    operation_id = "yearReport"
)]
#[get("/reports/years/{year}")]
pub async fn year_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<YearReport>> {
    session.require_user_id()?;
    let report = state.reports.year_register(path.into_inner()).await?;
    Ok(web::Json(report))
}

/// The year register as a CSV attachment.
#[utoipa::path(
    get,
    path = "/api/v1/reports/years/{year}/csv",
    params(("year" = i32, Path, description = "Register year")),
    responses(
        (status = 200, description = "CSV register", content_type = "text/csv"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reports"],
    operation_id = "yearReportCsv"
)]
#[get("/reports/years/{year}/csv")]
pub async fn year_report_csv(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let year = path.into_inner();
    let report = state.reports.year_register(year).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(attachment(&format!("diary-register-{year}.csv")))
        .body(render_year_report_csv(&report)))
}

/// The year register as a PDF attachment.
#[utoipa::path(
    get,
    path = "/api/v1/reports/years/{year}/pdf",
    params(("year" = i32, Path, description = "Register year")),
    responses(
        (status = 200, description = "PDF register", content_type = "application/pdf"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reports"],
    operation_id = "yearReportPdf"
)]
#[get("/reports/years/{year}/pdf")]
pub async fn year_report_pdf(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let year = path.into_inner();
    let report = state.reports.year_register(year).await?;
    let bytes = render_year_report_pdf(&report)?;
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(attachment(&format!("diary-register-{year}.pdf")))
        .body(bytes))
}

/// Dashboard for the current year.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Current-year dashboard", body = DashboardSummary),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reports"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardSummary>> {
    session.require_user_id()?;
    let year = chrono::Local::now().year();
    let summary = state.reports.dashboard(year).await?;
    Ok(web::Json(summary))
}

/// Dashboard for a specific year.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/{year}",
    params(("year" = i32, Path, description = "Register year")),
    responses(
        (status = 200, description = "Year dashboard", body = DashboardSummary),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reports"],
    operation_id = "dashboardYear"
)]
#[get("/dashboard/{year}")]
pub async fn dashboard_year(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<DashboardSummary>> {
    session.require_user_id()?;
    let summary = state.reports.dashboard(path.into_inner()).await?;
    Ok(web::Json(summary))
}
