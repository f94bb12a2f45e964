//! GraphQL inbound adapter served at `/api/graphql`.

pub mod handlers;
pub mod schema;

pub use handlers::{GRAPHQL_PATH, configure, graphql_get, graphql_post};
pub use schema::{UserSchema, build_schema};
