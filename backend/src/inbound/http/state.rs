//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on
//! domain ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CredentialsCommand, DiariesQuery, DiaryRegister, FixtureCredentialsCommand,
    FixtureDiariesQuery, FixtureDiaryRegister, FixtureLoginService, FixtureMovementRecorder,
    FixtureOfficesQuery, FixtureReportsQuery, LoginService, MovementRecorder, OfficesQuery,
    ReportsQuery,
};

/// Parameter object bundling every port implementation for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Credential verification.
    pub login: Arc<dyn LoginService>,
    /// Password maintenance.
    pub credentials: Arc<dyn CredentialsCommand>,
    /// Registration, edits, deletion.
    pub register: Arc<dyn DiaryRegister>,
    /// Movement recording.
    pub movements: Arc<dyn MovementRecorder>,
    /// Listing and detail.
    pub diaries: Arc<dyn DiariesQuery>,
    /// Year register and dashboard.
    pub reports: Arc<dyn ReportsQuery>,
    /// Office directory.
    pub offices: Arc<dyn OfficesQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential verification.
    pub login: Arc<dyn LoginService>,
    /// Password maintenance.
    pub credentials: Arc<dyn CredentialsCommand>,
    /// Registration, edits, deletion.
    pub register: Arc<dyn DiaryRegister>,
    /// Movement recording.
    pub movements: Arc<dyn MovementRecorder>,
    /// Listing and detail.
    pub diaries: Arc<dyn DiariesQuery>,
    /// Year register and dashboard.
    pub reports: Arc<dyn ReportsQuery>,
    /// Office directory.
    pub offices: Arc<dyn OfficesQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            credentials,
            register,
            movements,
            diaries,
            reports,
            offices,
        } = ports;
        Self {
            login,
            credentials,
            register,
            movements,
            diaries,
            reports,
            offices,
        }
    }

    /// State backed entirely by fixtures, for tests and database-less runs.
    #[must_use]
    pub fn fixture() -> Self {
        Self::new(HttpStatePorts {
            login: Arc::new(FixtureLoginService),
            credentials: Arc::new(FixtureCredentialsCommand),
            register: Arc::new(FixtureDiaryRegister),
            movements: Arc::new(FixtureMovementRecorder),
            diaries: Arc::new(FixtureDiariesQuery),
            reports: Arc::new(FixtureReportsQuery),
            offices: Arc::new(FixtureOfficesQuery),
        })
    }
}
