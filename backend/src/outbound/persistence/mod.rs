//! User persistence adapters.
//!
//! - `DieselUserRepository`: PostgreSQL via Diesel, `diesel-async` and a
//!   `bb8` pool built once per process.
//! - `InMemoryUserRepository`: same semantics without a database, used for
//!   local runs and tests.
//!
//! Row structs and the Diesel schema stay private to this module; adapters
//! translate them into domain types and map every failure onto
//! `UserPersistenceError`.

mod diesel_user_repository;
mod in_memory_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod user_error_mapping;

pub use diesel_user_repository::DieselUserRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
