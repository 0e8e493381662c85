//! Persistence adapters implementing the domain's outbound ports with
//! Diesel against PostgreSQL.

mod diesel_diary_repository;
mod diesel_login_service;
mod diesel_movement_repository;
mod diesel_office_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
pub mod schema;

pub use diesel_diary_repository::DieselDiaryRepository;
pub use diesel_login_service::DieselLoginService;
pub use diesel_movement_repository::DieselMovementRepository;
pub use diesel_office_repository::DieselOfficeRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
