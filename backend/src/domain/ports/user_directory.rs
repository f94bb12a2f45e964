//! Driving port consumed by the GraphQL resolvers.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId};

/// User management use-cases exposed to inbound adapters.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users, newest first.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// A single user, or `None` when the id is unknown.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, Error>;

    /// Create a user. A taken email yields [`crate::domain::ErrorCode::Conflict`].
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Update name and email. A taken email yields
    /// [`crate::domain::ErrorCode::Conflict`].
    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<User, Error>;

    /// Delete a user. Reports `false` instead of failing.
    async fn delete_user(&self, id: UserId) -> bool;
}
