//! Builders selecting Diesel-backed or fixture port implementations.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::{
    DiaryRegistrationService, MovementLogService, OfficeDirectoryService, RegisterQueryService,
    ReportingService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::persistence::{
    DbPool, DieselDiaryRepository, DieselLoginService, DieselMovementRepository,
    DieselOfficeRepository,
};

use super::ServerConfig;

/// Wire every port to its Diesel adapter and domain service.
fn diesel_ports(pool: &DbPool) -> HttpStatePorts {
    let diaries = Arc::new(DieselDiaryRepository::new(pool.clone()));
    let movements = Arc::new(DieselMovementRepository::new(pool.clone()));
    let offices = Arc::new(DieselOfficeRepository::new(pool.clone()));
    let login = Arc::new(DieselLoginService::new(pool.clone()));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    HttpStatePorts {
        login: login.clone(),
        credentials: login,
        register: Arc::new(DiaryRegistrationService::new(
            diaries.clone(),
            movements.clone(),
            offices.clone(),
            clock.clone(),
        )),
        movements: Arc::new(MovementLogService::new(
            diaries.clone(),
            movements.clone(),
            offices.clone(),
            clock,
        )),
        diaries: Arc::new(RegisterQueryService::new(
            diaries.clone(),
            movements.clone(),
        )),
        reports: Arc::new(ReportingService::new(diaries, movements)),
        offices: Arc::new(OfficeDirectoryService::new(offices)),
    }
}

/// Build the shared HTTP state: Diesel-backed when a pool is configured,
/// fixtures otherwise (tests and database-less runs).
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = config
        .db_pool
        .as_ref()
        .map_or_else(HttpState::fixture, |pool| {
            HttpState::new(diesel_ports(pool))
        });
    web::Data::new(state)
}
