//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::outbound::persistence::DbPool;

const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) graphql_endpoint: Option<Url>,
    pub(crate) action_timeout: Duration,
}

impl ServerConfig {
    /// Configuration serving from `bind_addr` with the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            graphql_endpoint: None,
            action_timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }

    /// Attach a database connection pool for the user repository.
    ///
    /// Without a pool the server keeps users in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Point the server actions at an explicit GraphQL endpoint.
    ///
    /// Defaults to this server's own `/api/graphql` on the loopback address.
    #[must_use]
    pub fn with_graphql_endpoint(mut self, endpoint: Url) -> Self {
        self.graphql_endpoint = Some(endpoint);
        self
    }

    /// Request timeout applied to every server action.
    #[must_use]
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
