//! Backend entry-point: loads settings, selects the message store, and serves
//! the REST endpoints with OpenAPI docs.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use message_board::inbound::http::health::HealthState;
use message_board::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("load server settings")?;
    let bind_addr = settings.bind_addr().wrap_err("parse bind address")?;
    let mut config = ServerConfig::new(bind_addr);

    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations() {
            let url = database_url.to_owned();
            let applied = tokio::task::spawn_blocking(move || run_migrations(&url))
                .await
                .wrap_err("join migration task")?
                .wrap_err("apply database migrations")?;
            info!(applied, "database schema is current");
        }

        let pool_config = PoolConfig::new(database_url)
            .with_max_size(settings.pool_max_size())
            .with_connection_timeout(settings.pool_connection_timeout());
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("create database pool")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database URL configured; messages are kept in memory");
        match settings.seed_user().wrap_err("validate seed user")? {
            Some(user) => config = config.with_seed_user(user),
            None => warn!(
                "no seed user configured; set MESSAGE_BOARD_SEED_USERNAME and \
                 MESSAGE_BOARD_SEED_PASSWORD so messages have an author"
            ),
        }
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("start HTTP server")?;
    info!(%bind_addr, "message board listening");
    let outcome = server.await.wrap_err("run HTTP server");
    health_state.mark_unhealthy();
    outcome
}
