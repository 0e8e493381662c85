//! Domain types and services for the diary register.
//!
//! Everything here is transport and storage agnostic: inbound adapters map
//! HTTP requests onto the driving ports in [`ports`], and the persistence
//! layer implements the outbound repository ports. Entities document their
//! invariants and serde contracts on the type itself.

pub mod diary;
pub mod error;
pub mod movement;
mod movement_log;
pub mod office;
pub mod ports;
mod query;
mod registration;
pub mod report;
mod reporting;
pub mod search;
mod trace_id;
pub mod user;

pub use self::diary::{
    Diary, DiaryAttributes, DiaryNumber, DiaryStatus, DiaryValidationError, DocumentKind,
};
pub use self::error::{Error, ErrorCode};
pub use self::movement::{
    HistoryEntry, Movement, MovementAction, movement_history, render_history_plain,
};
pub use self::movement_log::MovementLogService;
pub use self::office::{Office, OfficeName, OfficeValidationError, REGISTRY_OFFICE};
pub use self::query::{OfficeDirectoryService, RegisterQueryService};
pub use self::registration::{DiaryRegistrationService, INITIAL_MOVEMENT_REMARKS};
pub use self::report::{DashboardSummary, StatusCount, YearReport, YearReportRow};
pub use self::reporting::ReportingService;
pub use self::search::{DiaryFilter, SearchTerm};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, LoginCredentials, LoginValidationError, User, UserId, UserValidationError,
    Username,
};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
