//! Inbound adapters that translate external requests into domain calls while
//! keeping framework details at the edge.
//!
//! - [`graphql`] serves the schema at `/api/graphql`
//! - [`http`] renders the users page, accepts its forms and exposes probes
//! - [`console`] is the stateful component the page drives

pub mod console;
pub mod graphql;
pub mod http;
