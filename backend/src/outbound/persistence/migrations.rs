//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary and applied at startup, so a
//! deployment never runs against a stale schema. The harness runs on a
//! plain synchronous connection; it executes once before the server starts
//! accepting traffic.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// All migrations shipped with the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open the migration connection.
    #[error("failed to connect for migrations: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to run migrations: {0}")]
    Apply(String),
}

/// Apply any pending migrations against the given database.
///
/// # Errors
/// Returns [`MigrationError`] when the connection cannot be opened or a
/// migration fails; the transaction semantics of the harness leave the
/// schema at the last successful migration.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply(err.to_string()))?;
    for version in &applied {
        info!(migration = %version, "applied migration");
    }
    if applied.is_empty() {
        info!("schema already up to date");
    }
    Ok(())
}
