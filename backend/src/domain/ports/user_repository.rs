//! Driven port for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    ///
    /// Adapters decide the variant from the store's own error kind, so
    /// callers never inspect driver codes or message text.
    pub enum UserPersistenceError {
        /// A unique constraint (the email index) rejected the write.
        Conflict { message: String } => "user write conflicts with an existing record: {message}",
        /// The addressed row does not exist.
        NotFound { message: String } => "user not found: {message}",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Single-row user storage operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, most recently created first.
    async fn list_newest_first(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new user; the store assigns id and timestamps.
    async fn insert(&self, draft: &UserDraft) -> Result<User, UserPersistenceError>;

    /// Replace name and email of an existing user.
    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<User, UserPersistenceError>;

    /// Remove a user.
    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError>;
}
