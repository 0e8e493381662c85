//! Backend entry point: configuration, migrations, and server startup.

mod server;

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::persistence::{
    DbPool, DieselLoginService, PoolConfig, run_pending_migrations,
};
use server::ServerConfig;

const BIND_ENV: &str = "HTTP_BIND";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const INITIAL_ADMIN_USERNAME_ENV: &str = "INITIAL_ADMIN_USERNAME";
const INITIAL_ADMIN_PASSWORD_ENV: &str = "INITIAL_ADMIN_PASSWORD";
const DEFAULT_BIND: &str = "0.0.0.0:8080";

fn io_other(message: String) -> std::io::Error {
    std::io::Error::other(message)
}

/// Apply migrations and build the pool for the configured database.
async fn connect_database(database_url: String) -> std::io::Result<DbPool> {
    let migration_url = database_url.clone();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|err| io_other(format!("migration task failed: {err}")))?
        .map_err(|err| io_other(err.to_string()))?;

    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| io_other(err.to_string()))
}

/// Create the first operator account on an empty user table.
///
/// Release deployments must provide the initial password explicitly; debug
/// builds fall back to the fixture pair for local work.
async fn seed_initial_user(pool: &DbPool) -> std::io::Result<()> {
    let username =
        env::var(INITIAL_ADMIN_USERNAME_ENV).unwrap_or_else(|_| "admin".to_owned());
    let password = match env::var(INITIAL_ADMIN_PASSWORD_ENV) {
        Ok(value) if !value.is_empty() => value,
        _ if cfg!(debug_assertions) => {
            warn!("INITIAL_ADMIN_PASSWORD not set; using the dev default");
            "password".to_owned()
        }
        _ => {
            warn!("INITIAL_ADMIN_PASSWORD not set; skipping initial account");
            return Ok(());
        }
    };

    DieselLoginService::new(pool.clone())
        .ensure_initial_user(&username, "Administrator", password)
        .await
        .map_err(|err| io_other(format!("initial account setup failed: {err}")))
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    actix_web_prom::PrometheusMetricsBuilder::new("diary_register")
        .endpoint("/metrics")
        .build()
        .map_err(|err| io_other(format!("metrics configuration failed: {err}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let settings =
        session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .map_err(|err| io_other(err.to_string()))?;

    let bind_addr: SocketAddr = env::var(BIND_ENV)
        .unwrap_or_else(|_| DEFAULT_BIND.to_owned())
        .parse()
        .map_err(|err| io_other(format!("invalid {BIND_ENV}: {err}")))?;

    let mut config = ServerConfig::new(
        settings.key,
        settings.cookie_secure,
        settings.same_site,
        bind_addr,
    );

    match env::var(DATABASE_URL_ENV) {
        Ok(database_url) => {
            let pool = connect_database(database_url).await?;
            seed_initial_user(&pool).await?;
            config = config.with_db_pool(pool);
        }
        Err(_) => {
            warn!("DATABASE_URL not set; serving fixture data only");
        }
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(make_metrics()?));
    }

    info!(addr = %config.bind_addr(), "starting diary register backend");
    let health_state = web::Data::new(HealthState::new());
    create_server_and_run(health_state, config).await
}

async fn create_server_and_run(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<()> {
    server::create_server(health_state, config)?.await
}
