//! Driving port for the server actions the management console invokes.
//!
//! Every operation resolves to an [`ActionOutcome`]; failures never escape
//! as errors. Implementations talk to the GraphQL API and revalidate the
//! page after successful writes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Fallback message used when a failure carries no text of its own.
pub const GENERIC_ACTION_ERROR: &str = "An error occurred";

/// User record as returned by the GraphQL API.
///
/// Mutations only select `id`, `name` and `email`, so timestamps are
/// optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Result shape handed to the console: a payload or an error string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome<T> {
    Succeeded(T),
    Failed { error: String },
}

impl<T> ActionOutcome<T> {
    /// Build a failure, substituting [`GENERIC_ACTION_ERROR`] for blank text.
    ///
    /// # Examples
    /// ```
    /// use user_admin::domain::ports::{ActionOutcome, GENERIC_ACTION_ERROR};
    ///
    /// let outcome = ActionOutcome::<()>::failed("  ");
    /// assert_eq!(outcome.error(), Some(GENERIC_ACTION_ERROR));
    /// ```
    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        if error.trim().is_empty() {
            return Self::Failed {
                error: GENERIC_ACTION_ERROR.to_owned(),
            };
        }
        Self::Failed { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Error text of a failed outcome.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed { error } => Some(error.as_str()),
        }
    }

    /// Drop the payload, keeping success or the error text.
    pub fn discard(self) -> ActionOutcome<()> {
        match self {
            Self::Succeeded(_) => ActionOutcome::Succeeded(()),
            Self::Failed { error } => ActionOutcome::Failed { error },
        }
    }
}

/// Server actions backing the management console.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserActions: Send + Sync {
    /// Fetch every user. Does not revalidate.
    async fn get_users(&self) -> ActionOutcome<Vec<UserRecord>>;

    async fn create_user(&self, name: String, email: String) -> ActionOutcome<UserRecord>;

    async fn update_user(
        &self,
        id: String,
        name: String,
        email: String,
    ) -> ActionOutcome<UserRecord>;

    async fn delete_user(&self, id: String) -> ActionOutcome<()>;
}
