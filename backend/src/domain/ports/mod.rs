//! Domain ports for the hexagonal boundary.
//!
//! Outbound ports (repositories) are implemented by the persistence layer;
//! driving ports (queries and commands) are implemented by domain services
//! and consumed by inbound adapters. Every driving port ships a fixture
//! implementation so the server can run without a database.

mod macros;
pub(crate) use macros::define_port_error;

mod credentials_command;
mod diaries_query;
mod diary_register;
mod diary_repository;
mod login_service;
mod movement_recorder;
mod movement_repository;
mod office_repository;
mod offices_query;
mod reports_query;

pub use credentials_command::{
    ChangePasswordRequest, CredentialsCommand, FixtureCredentialsCommand,
};
pub use diaries_query::{DiariesQuery, DiaryWithMovements, FixtureDiariesQuery};
pub use diary_register::{
    DiaryRegister, FixtureDiaryRegister, RegisterDiaryRequest, RegisteredDiary,
};
#[cfg(test)]
pub use diary_repository::MockDiaryRepository;
pub use diary_repository::{
    DiaryRepository, DiaryRepositoryError, FixtureDiaryRepository, NewDiaryRecord, PositionUpdate,
};
pub use login_service::{FIXTURE_USER_ID, FixtureLoginService, LoginService};
pub use movement_recorder::{
    FixtureMovementRecorder, MovementRecorded, MovementRecorder, RecordMovementRequest,
};
#[cfg(test)]
pub use movement_repository::MockMovementRepository;
pub use movement_repository::{
    FixtureMovementRepository, MovementRepository, MovementRepositoryError, NewMovementRecord,
};
#[cfg(test)]
pub use office_repository::MockOfficeRepository;
pub use office_repository::{FixtureOfficeRepository, OfficeRepository, OfficeRepositoryError};
pub use offices_query::{FixtureOfficesQuery, OfficesQuery};
pub use reports_query::{FixtureReportsQuery, ReportsQuery};
