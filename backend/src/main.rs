//! GameNest entry-point: loads settings, prepares the store and serves the
//! REST API, the HTML pages and (in debug builds) the OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gamenest::inbound::http::health::HealthState;
use gamenest::inbound::http::session_config::{BuildMode, session_settings_from};
use gamenest::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use gamenest::settings::AppSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from(&settings, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %session.fingerprint(),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let mut config =
        ServerConfig::new(session, settings.bind_addr()).with_demo_games(settings.seed_demo_games);

    if let Some(url) = settings.database_url() {
        let migrations_url = url.to_owned();
        tokio::task::spawn_blocking(move || run_pending_migrations(&migrations_url))
            .await
            .wrap_err("migration task panicked")?
            .wrap_err("failed to apply migrations")?;
        let pool = DbPool::new(
            PoolConfig::new(url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if actix_web::rt::signal::ctrl_c().await.is_ok() {
            health_state.mark_unhealthy();
            handle.stop(true).await;
        }
    });

    server.await?;
    Ok(())
}
