//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: Diesel-backed and in-memory user repositories
//! - **graphql**: reqwest client and the server actions built on it
//! - **cache**: page cache generations published over watch channels
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod graphql;
pub mod persistence;
