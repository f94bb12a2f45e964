//! User administration service: a GraphQL API over a `users` table and a
//! server-rendered management page driven by server actions.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Request tracing middleware.
pub use middleware::Trace;
