//! Process settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USER_ADMIN_*` environment variables and
//! configuration files, in OrthoConfig's usual precedence. `DATABASE_URL` is
//! honoured as a fallback for the database URL.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::inbound::graphql::GRAPHQL_PATH;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_MIN_IDLE: u32 = 1;
const DEFAULT_POOL_CHECKOUT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ACTION_TIMEOUT_SECS: u64 = 10;
const DATABASE_URL_FALLBACK: &str = "DATABASE_URL";

/// Settings that cannot be turned into a server configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid GraphQL endpoint `{value}`: {source}")]
    GraphqlEndpoint {
        value: String,
        source: url::ParseError,
    },
}

/// Configuration values controlling the HTTP server and its backing store.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_ADMIN")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; users are kept in memory when absent.
    pub database_url: Option<String>,
    /// GraphQL endpoint the server actions call.
    pub graphql_endpoint: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Connections the pool keeps open while idle.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_checkout_timeout_secs: Option<u64>,
    /// Seconds before a server action's GraphQL request is abandoned.
    pub action_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Configured bind address, falling back to `0.0.0.0:3000`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Database URL from settings or the plain `DATABASE_URL` variable.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var(DATABASE_URL_FALLBACK).ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Explicit GraphQL endpoint, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::GraphqlEndpoint`] when the value is not a URL.
    pub fn graphql_endpoint(&self) -> Result<Option<Url>, SettingsError> {
        self.graphql_endpoint
            .as_deref()
            .map(|value| {
                Url::parse(value).map_err(|source| SettingsError::GraphqlEndpoint {
                    value: value.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn pool_min_idle(&self) -> u32 {
        self.pool_min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE)
    }

    pub fn pool_checkout_timeout(&self) -> Duration {
        Duration::from_secs(
            self.pool_checkout_timeout_secs
                .unwrap_or(DEFAULT_POOL_CHECKOUT_TIMEOUT_SECS),
        )
    }

    /// Timeout for each server action, 10 seconds unless configured.
    pub fn action_timeout(&self) -> Duration {
        Duration::from_secs(
            self.action_timeout_secs
                .unwrap_or(DEFAULT_ACTION_TIMEOUT_SECS),
        )
    }
}

/// Loopback endpoint for a server listening on `addr`.
///
/// # Errors
///
/// Returns [`SettingsError::GraphqlEndpoint`] if the URL cannot be built.
pub fn local_graphql_endpoint(addr: SocketAddr) -> Result<Url, SettingsError> {
    let value = format!("http://127.0.0.1:{}{GRAPHQL_PATH}", addr.port());
    Url::parse(&value).map_err(|source| SettingsError::GraphqlEndpoint { value, source })
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("user-admin")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("USER_ADMIN_BIND_ADDR", None::<String>),
            ("USER_ADMIN_DATABASE_URL", None::<String>),
            ("USER_ADMIN_GRAPHQL_ENDPOINT", None::<String>),
            ("USER_ADMIN_POOL_MAX_SIZE", None::<String>),
            ("USER_ADMIN_POOL_MIN_IDLE", None::<String>),
            ("USER_ADMIN_POOL_CHECKOUT_TIMEOUT_SECS", None::<String>),
            ("USER_ADMIN_ACTION_TIMEOUT_SECS", None::<String>),
            ("DATABASE_URL", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:3000".parse::<SocketAddr>().expect("valid address")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.graphql_endpoint().expect("no endpoint"), None);
        assert_eq!(settings.pool_max_size(), 10);
        assert_eq!(settings.pool_min_idle(), 1);
        assert_eq!(settings.pool_checkout_timeout(), Duration::from_secs(30));
        assert_eq!(settings.action_timeout(), Duration::from_secs(10));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("USER_ADMIN_BIND_ADDR", Some("127.0.0.1:8081".to_owned())),
            (
                "USER_ADMIN_DATABASE_URL",
                Some("postgres://localhost/users".to_owned()),
            ),
            (
                "USER_ADMIN_GRAPHQL_ENDPOINT",
                Some("http://api.internal/api/graphql".to_owned()),
            ),
            ("USER_ADMIN_POOL_MAX_SIZE", Some("4".to_owned())),
            ("USER_ADMIN_POOL_MIN_IDLE", Some("0".to_owned())),
            ("USER_ADMIN_POOL_CHECKOUT_TIMEOUT_SECS", Some("5".to_owned())),
            ("USER_ADMIN_ACTION_TIMEOUT_SECS", Some("3".to_owned())),
            ("DATABASE_URL", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            8081
        );
        assert_eq!(
            settings.database_url().as_deref(),
            Some("postgres://localhost/users")
        );
        assert_eq!(
            settings
                .graphql_endpoint()
                .expect("valid endpoint")
                .map(String::from),
            Some("http://api.internal/api/graphql".to_owned())
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(settings.pool_min_idle(), 0);
        assert_eq!(settings.pool_checkout_timeout(), Duration::from_secs(5));
        assert_eq!(settings.action_timeout(), Duration::from_secs(3));
    }

    #[rstest]
    fn plain_database_url_is_a_fallback() {
        let _guard = lock_env([
            ("USER_ADMIN_DATABASE_URL", None::<String>),
            ("DATABASE_URL", Some("postgres://fallback/users".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url().as_deref(),
            Some("postgres://fallback/users")
        );
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let settings = ServerSettings {
            bind_addr: Some("not an address".to_owned()),
            graphql_endpoint: Some("::".to_owned()),
            ..ServerSettings::default()
        };

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
        assert!(matches!(
            settings.graphql_endpoint(),
            Err(SettingsError::GraphqlEndpoint { .. })
        ));
    }

    #[rstest]
    fn local_endpoint_uses_the_bound_port() {
        let addr: SocketAddr = "0.0.0.0:4321".parse().expect("valid address");
        let endpoint = local_graphql_endpoint(addr).expect("valid endpoint");
        assert_eq!(endpoint.as_str(), "http://127.0.0.1:4321/api/graphql");
    }
}
