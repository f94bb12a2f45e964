//! GraphQL schema for user management.
//!
//! Resolvers parse GraphQL input into domain types and delegate to the
//! [`UserDirectory`] port stored in the schema data. Domain errors surface in
//! the standard `errors` array with `extensions.code` set to the
//! [`ErrorCode`] wire name. Validation failures also carry
//! `extensions.details.field` naming the offending argument.
//!
//! Errors with [`ErrorCode::InternalError`] (store query failures included)
//! reach clients as `Internal server error`; the original message is logged
//! and correlated through `extensions.traceId`. Every other category keeps
//! its message verbatim.

use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, ID, Object, Schema, SimpleObject,
};
use serde_json::json;
use tracing::error;

use crate::domain::ports::UserDirectory;
use crate::domain::{Error, ErrorCode, User, UserDraft, UserId, UserValidationError};

/// Executable schema type served by the HTTP handlers.
pub type UserSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema over a user directory.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use user_admin::domain::UserDirectoryService;
/// use user_admin::inbound::graphql::build_schema;
/// use user_admin::outbound::persistence::InMemoryUserRepository;
///
/// let repository = Arc::new(InMemoryUserRepository::new(Arc::new(DefaultClock)));
/// let schema = build_schema(Arc::new(UserDirectoryService::new(repository)));
/// assert!(schema.sdl().contains("deleteUser"));
/// ```
pub fn build_schema(directory: Arc<dyn UserDirectory>) -> UserSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(directory)
        .finish()
}

/// GraphQL projection of [`User`] with RFC 3339 timestamps.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    id: ID,
    name: String,
    email: String,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl From<User> for UserObject {
    fn from(user: User) -> Self {
        Self {
            id: ID::from(user.id().to_string()),
            name: user.name().to_string(),
            email: user.email().to_string(),
            created_at: Some(user.created_at().to_rfc3339()),
            updated_at: Some(user.updated_at().to_rfc3339()),
        }
    }
}

fn graphql_error(err: Error) -> async_graphql::Error {
    let err = if matches!(err.code(), ErrorCode::InternalError) {
        error!(error = %err, "internal error surfaced through GraphQL");
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = err.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        err
    };
    let code = err.code().as_str().to_owned();
    let trace_id = err.trace_id().map(str::to_owned);
    let details = err
        .details()
        .and_then(|details| async_graphql::Value::from_json(details.clone()).ok());
    async_graphql::Error::new(err.message()).extend_with(|_, extensions| {
        extensions.set("code", code);
        if let Some(trace_id) = trace_id {
            extensions.set("traceId", trace_id);
        }
        if let Some(details) = details {
            extensions.set("details", details);
        }
    })
}

fn directory<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<dyn UserDirectory>> {
    ctx.data::<Arc<dyn UserDirectory>>()
}

fn validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

fn parse_id(id: &ID) -> Result<UserId, Error> {
    UserId::parse(id.as_str()).map_err(validation_error)
}

fn parse_draft(name: String, email: String) -> Result<UserDraft, Error> {
    UserDraft::try_from_strings(name, email).map_err(validation_error)
}

/// Read-only operations.
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Every user, newest first.
    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UserObject>> {
        let users = directory(ctx)?.list_users().await.map_err(graphql_error)?;
        Ok(users.into_iter().map(UserObject::from).collect())
    }

    /// A single user, or `null` when no user has this id.
    async fn user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<UserObject>> {
        let id = parse_id(&id).map_err(graphql_error)?;
        let user = directory(ctx)?.find_user(id).await.map_err(graphql_error)?;
        Ok(user.map(UserObject::from))
    }
}

/// Write operations.
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
    ) -> async_graphql::Result<UserObject> {
        let draft = parse_draft(name, email).map_err(graphql_error)?;
        let user = directory(ctx)?
            .create_user(draft)
            .await
            .map_err(graphql_error)?;
        Ok(user.into())
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: String,
        email: String,
    ) -> async_graphql::Result<UserObject> {
        let id = parse_id(&id).map_err(graphql_error)?;
        let draft = parse_draft(name, email).map_err(graphql_error)?;
        let user = directory(ctx)?
            .update_user(id, draft)
            .await
            .map_err(graphql_error)?;
        Ok(user.into())
    }

    /// Returns `false` instead of an error when nothing was deleted.
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let Ok(id) = UserId::parse(id.as_str()) else {
            return Ok(false);
        };
        Ok(directory(ctx)?.delete_user(id).await)
    }
}
