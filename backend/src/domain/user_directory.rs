//! User directory service implementing the [`UserDirectory`] driving port.
//!
//! Resolvers are thin: this service forwards to the repository and only
//! translates persistence failures into domain errors. Create and update
//! raise on failure while delete reports `false`; both behaviours are kept
//! as-is for API compatibility.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{UserDirectory, UserPersistenceError, UserRepository};
use crate::domain::{DUPLICATE_EMAIL_MESSAGE, Error, User, UserDraft, UserId};

/// Repository-backed user directory.
#[derive(Clone)]
pub struct UserDirectoryService<R> {
    repository: Arc<R>,
}

impl<R> UserDirectoryService<R> {
    /// Create a service over a shared repository.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use user_admin::domain::UserDirectoryService;
    /// use user_admin::outbound::persistence::InMemoryUserRepository;
    ///
    /// let repository = InMemoryUserRepository::new(Arc::new(DefaultClock));
    /// let _service = UserDirectoryService::new(Arc::new(repository));
    /// ```
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Conflict { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE),
        UserPersistenceError::NotFound { message } => Error::not_found(message),
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}

#[async_trait]
impl<R> UserDirectory for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repository
            .list_newest_first()
            .await
            .map_err(map_persistence_error)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)
    }

    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        self.repository
            .insert(&draft)
            .await
            .map_err(map_persistence_error)
    }

    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<User, Error> {
        self.repository
            .update(id, &draft)
            .await
            .map_err(map_persistence_error)
    }

    async fn delete_user(&self, id: UserId) -> bool {
        match self.repository.delete(id).await {
            Ok(()) => true,
            Err(error) => {
                warn!(user_id = %id, %error, "delete failed; reporting false");
                false
            }
        }
    }
}
