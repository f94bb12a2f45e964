//! GraphQL-over-HTTP adapters backing the server actions.

mod client;
mod user_actions;

pub use client::{ActionError, GraphqlClient};
pub use user_actions::GraphqlUserActions;
