//! Shared helpers for integration tests.

use std::net::SocketAddr;

use actix_web::web;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use user_admin::inbound::http::health::HealthState;
use user_admin::server::{ServerConfig, create_server};

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
#[allow(dead_code, reason = "each integration test binary uses a subset of helpers")]
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a `SKIP-TEST-CLUSTER` marker when allowed, otherwise fail loudly.
#[allow(dead_code, reason = "each integration test binary uses a subset of helpers")]
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Render a `postgres` error with its SQLSTATE and message.
#[allow(dead_code, reason = "each integration test binary uses a subset of helpers")]
pub fn format_postgres_error(error: &postgres::Error) -> String {
    match error.as_db_error() {
        Some(db_error) => format!(
            "postgres error {:?}: {}",
            db_error.code(),
            db_error.message()
        ),
        None => error.to_string(),
    }
}

/// Drop and recreate `name` so each run starts from an empty database.
#[allow(dead_code, reason = "each integration test binary uses a subset of helpers")]
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    // Separate statements: neither may run inside an implicit transaction.
    client
        .batch_execute(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))
}

/// Start the server on an ephemeral loopback port with the in-memory store.
///
/// Must run inside an Actix system.
#[allow(dead_code, reason = "each integration test binary uses a subset of helpers")]
pub fn spawn_in_memory_server() -> (SocketAddr, actix_web::dev::ServerHandle) {
    let config = ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)));
    let running = create_server(web::Data::new(HealthState::new()), config)
        .expect("server should start");
    let handle = running.server.handle();
    actix_rt::spawn(running.server);
    (running.local_addr, handle)
}
