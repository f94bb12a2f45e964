//! Server actions implemented as GraphQL calls against the local API.
//!
//! Each action sends one document, converts any failure into
//! `ActionOutcome::Failed`, and revalidates `/` after a successful write.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{
    ActionOutcome, PageRevalidator, USERS_PAGE_PATH, UserActions, UserRecord,
};

use super::client::{ActionError, GraphqlClient};

const GET_USERS: &str = r"
query GetUsers {
  users {
    id
    name
    email
    createdAt
    updatedAt
  }
}";

const CREATE_USER: &str = r"
mutation CreateUser($name: String!, $email: String!) {
  createUser(name: $name, email: $email) {
    id
    name
    email
  }
}";

const UPDATE_USER: &str = r"
mutation UpdateUser($id: ID!, $name: String!, $email: String!) {
  updateUser(id: $id, name: $name, email: $email) {
    id
    name
    email
  }
}";

const DELETE_USER: &str = r"
mutation DeleteUser($id: ID!) {
  deleteUser(id: $id)
}";

#[derive(Deserialize)]
struct UsersData {
    users: Vec<UserRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserData {
    create_user: UserRecord,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserData {
    update_user: UserRecord,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteUserData {
    delete_user: bool,
}

/// [`UserActions`] backed by the GraphQL endpoint.
#[derive(Clone)]
pub struct GraphqlUserActions {
    client: GraphqlClient,
    revalidator: Arc<dyn PageRevalidator>,
}

impl GraphqlUserActions {
    pub fn new(client: GraphqlClient, revalidator: Arc<dyn PageRevalidator>) -> Self {
        Self {
            client,
            revalidator,
        }
    }

    fn settle<T>(&self, action: &'static str, result: Result<T, ActionError>) -> ActionOutcome<T> {
        match result {
            Ok(value) => ActionOutcome::Succeeded(value),
            Err(error) => {
                warn!(action, %error, "server action failed");
                ActionOutcome::failed(error.to_string())
            }
        }
    }

    fn settle_write<T>(
        &self,
        action: &'static str,
        result: Result<T, ActionError>,
    ) -> ActionOutcome<T> {
        let outcome = self.settle(action, result);
        if outcome.is_success() {
            self.revalidator.revalidate_path(USERS_PAGE_PATH);
        }
        outcome
    }
}

#[async_trait]
impl UserActions for GraphqlUserActions {
    async fn get_users(&self) -> ActionOutcome<Vec<UserRecord>> {
        let result = self
            .client
            .execute::<UsersData>(GET_USERS, json!({}))
            .await
            .map(|data| data.users);
        self.settle("get_users", result)
    }

    async fn create_user(&self, name: String, email: String) -> ActionOutcome<UserRecord> {
        let result = self
            .client
            .execute::<CreateUserData>(CREATE_USER, json!({ "name": name, "email": email }))
            .await
            .map(|data| data.create_user);
        self.settle_write("create_user", result)
    }

    async fn update_user(
        &self,
        id: String,
        name: String,
        email: String,
    ) -> ActionOutcome<UserRecord> {
        let result = self
            .client
            .execute::<UpdateUserData>(
                UPDATE_USER,
                json!({ "id": id, "name": name, "email": email }),
            )
            .await
            .map(|data| data.update_user);
        self.settle_write("update_user", result)
    }

    async fn delete_user(&self, id: String) -> ActionOutcome<()> {
        let result = self
            .client
            .execute::<DeleteUserData>(DELETE_USER, json!({ "id": id.as_str() }))
            .await
            .map(|data| {
                // The API reports a failed delete as `false`, not an error;
                // the action still counts as settled successfully.
                if !data.delete_user {
                    debug!(user_id = %id, "API reported delete as not applied");
                }
            });
        self.settle_write("delete_user", result)
    }
}
