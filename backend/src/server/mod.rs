//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{ServerSettings, SettingsError, local_graphql_endpoint};

use state_builders::{build_graphql_schema, build_http_state};

use std::net::{SocketAddr, TcpListener};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::Trace;
use crate::inbound::graphql::{self, UserSchema};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::page;
use crate::inbound::http::state::HttpState;
use crate::outbound::cache::PageCache;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    schema: web::Data<UserSchema>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        schema,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(schema)
        .wrap(Trace)
        .configure(graphql::configure)
        .configure(page::configure)
        .service(ready)
        .service(live)
}

/// A started server and the address it listens on.
pub struct RunningServer {
    pub server: Server,
    pub local_addr: SocketAddr,
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// The listener is bound before the app is built so a port of `0` resolves
/// to the real port, which the default GraphQL endpoint then targets.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket, building the HTTP
/// client or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<RunningServer> {
    let ServerConfig {
        bind_addr,
        db_pool,
        graphql_endpoint,
        action_timeout,
    } = config;

    let listener = TcpListener::bind(bind_addr)?;
    let local_addr = listener.local_addr()?;
    let endpoint = match graphql_endpoint {
        Some(endpoint) => endpoint,
        None => local_graphql_endpoint(local_addr).map_err(std::io::Error::other)?,
    };

    let page_cache = PageCache::new();
    let http_state = web::Data::new(build_http_state(endpoint, action_timeout, &page_cache)?);
    let schema = web::Data::new(build_graphql_schema(db_pool.as_ref()));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            schema: schema.clone(),
        })
    })
    .listen(listener)?
    .run();

    health_state.mark_ready();
    info!(addr = %local_addr, "server listening");
    Ok(RunningServer { server, local_addr })
}

#[cfg(test)]
mod tests;
