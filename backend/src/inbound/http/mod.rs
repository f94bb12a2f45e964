//! HTTP inbound adapter: the users page, form endpoints and health probes.

pub mod error;
pub mod health;
pub mod page;
pub mod state;

pub use error::ApiResult;
