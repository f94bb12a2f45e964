//! Backend entry-point: loads settings, prepares persistence and serves the
//! users page, GraphQL API and health probes.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use user_admin::inbound::http::health::HealthState;
use user_admin::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use user_admin::server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let mut config =
        ServerConfig::new(bind_addr).with_action_timeout(settings.action_timeout());

    if let Some(endpoint) = settings.graphql_endpoint().map_err(std::io::Error::other)? {
        config = config.with_graphql_endpoint(endpoint);
    }

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(&database_url)
            .await
            .map_err(std::io::Error::other)?;
        let pool_config = PoolConfig::new(database_url)
            .with_max_size(settings.pool_max_size())
            .with_min_idle(Some(settings.pool_min_idle()))
            .with_connection_timeout(settings.pool_checkout_timeout());
        let pool = DbPool::new(pool_config)
            .await
            .map_err(std::io::Error::other)?;
        info!("database pool ready");
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let running = create_server(health_state, config)?;
    running.server.await
}
