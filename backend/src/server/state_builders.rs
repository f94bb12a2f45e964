//! Builders for the GraphQL schema and HTTP page state.

use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;
use tracing::info;
use url::Url;

use crate::domain::UserDirectoryService;
use crate::domain::ports::UserDirectory;
use crate::inbound::graphql::{UserSchema, build_schema};
use crate::inbound::http::state::HttpState;
use crate::outbound::cache::PageCache;
use crate::outbound::graphql::{GraphqlClient, GraphqlUserActions};
use crate::outbound::persistence::{DbPool, DieselUserRepository, InMemoryUserRepository};

/// Build the user directory over Diesel when a pool is available, otherwise
/// over the in-memory repository.
pub(crate) fn build_user_directory(db_pool: Option<&DbPool>) -> Arc<dyn UserDirectory> {
    match db_pool {
        Some(pool) => {
            let repository = Arc::new(DieselUserRepository::new(pool.clone()));
            Arc::new(UserDirectoryService::new(repository))
        }
        None => {
            info!("no database configured; users are kept in memory");
            let repository = Arc::new(InMemoryUserRepository::new(Arc::new(DefaultClock)));
            Arc::new(UserDirectoryService::new(repository))
        }
    }
}

pub(crate) fn build_graphql_schema(db_pool: Option<&DbPool>) -> UserSchema {
    build_schema(build_user_directory(db_pool))
}

/// Wire the server actions to `endpoint` and the page cache.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be constructed.
pub(crate) fn build_http_state(
    endpoint: Url,
    timeout: Duration,
    page_cache: &PageCache,
) -> std::io::Result<HttpState> {
    info!(endpoint = %endpoint, "server actions target GraphQL endpoint");
    let client = GraphqlClient::new(endpoint, timeout).map_err(std::io::Error::other)?;
    let actions = GraphqlUserActions::new(client, Arc::new(page_cache.clone()));
    Ok(HttpState::new(Arc::new(actions), Arc::new(page_cache.clone())))
}
