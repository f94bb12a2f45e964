//! Reqwest-backed GraphQL client.
//!
//! Owns transport details only: request serialisation, the no-store cache
//! directive, and decoding the `{data, errors}` envelope. When the envelope
//! carries errors, the first error's message wins.

use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, HeaderValue};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

/// Failures raised while executing a GraphQL document.
///
/// `Display` yields the bare message so it can be shown to operators as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The API answered with an `errors` array.
    #[error("{message}")]
    Graphql { message: String },
    /// The request could not be sent or the status was unexpected.
    #[error("{message}")]
    Transport { message: String },
    /// The body was not a usable GraphQL response.
    #[error("{message}")]
    Decode { message: String },
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorDto {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorDto>>,
}

/// Client bound to a single GraphQL endpoint.
#[derive(Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: Url,
}

impl GraphqlClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// POST `{query, variables}` and decode `data` into `T`.
    ///
    /// # Errors
    ///
    /// [`ActionError::Graphql`] carries the first reported error message;
    /// transport and decoding failures map to the other variants.
    pub async fn execute<T>(&self, query: &str, variables: Value) -> Result<T, ActionError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|err| ActionError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| ActionError::Transport {
            message: err.to_string(),
        })?;
        decode_envelope(status, body.as_ref())
    }
}

fn decode_envelope<T>(status: reqwest::StatusCode, body: &[u8]) -> Result<T, ActionError>
where
    T: DeserializeOwned,
{
    let envelope: Envelope<T> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(err) if status.is_success() => {
            return Err(ActionError::Decode {
                message: format!("invalid GraphQL response: {err}"),
            });
        }
        Err(_) => {
            return Err(ActionError::Transport {
                message: format!("GraphQL endpoint returned {status}"),
            });
        }
    };

    if let Some(first) = envelope.errors.into_iter().flatten().next() {
        debug!(%status, message = first.message.as_str(), "GraphQL request reported errors");
        return Err(ActionError::Graphql {
            message: first.message,
        });
    }

    envelope.data.ok_or_else(|| ActionError::Decode {
        message: "GraphQL response carried no data".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use rstest::rstest;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Deleted {
        #[serde(rename = "deleteUser")]
        delete_user: bool,
    }

    #[rstest]
    fn data_is_decoded() {
        let decoded: Deleted =
            decode_envelope(StatusCode::OK, br#"{"data":{"deleteUser":true}}"#).expect("data");
        assert_eq!(decoded, Deleted { delete_user: true });
    }

    #[rstest]
    #[case(br#"{"data":{"deleteUser":false},"errors":null}"#.as_slice())]
    #[case(br#"{"data":{"deleteUser":false},"errors":[]}"#.as_slice())]
    fn null_or_empty_errors_mean_success(#[case] body: &[u8]) {
        let decoded: Deleted = decode_envelope(StatusCode::OK, body).expect("data");
        assert_eq!(decoded, Deleted { delete_user: false });
    }

    #[rstest]
    fn first_error_message_wins() {
        let body = br#"{"data":null,"errors":[
            {"message":"A user with this email already exists"},
            {"message":"second"}
        ]}"#;
        let err = decode_envelope::<Deleted>(StatusCode::OK, body).expect_err("graphql error");
        assert_eq!(
            err,
            ActionError::Graphql {
                message: "A user with this email already exists".to_owned()
            }
        );
    }

    #[rstest]
    fn errors_in_non_success_bodies_still_surface() {
        let body = br#"{"errors":[{"message":"bad query"}]}"#;
        let err =
            decode_envelope::<Deleted>(StatusCode::BAD_REQUEST, body).expect_err("graphql error");
        assert_eq!(err.to_string(), "bad query");
    }

    #[rstest]
    #[case(StatusCode::OK, b"<html>".as_slice(), "decode")]
    #[case(StatusCode::BAD_GATEWAY, b"<html>".as_slice(), "transport")]
    #[case(StatusCode::OK, br#"{"data":null}"#.as_slice(), "decode")]
    fn unusable_bodies_are_classified(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        let err = decode_envelope::<Deleted>(status, body).expect_err("unusable body");
        let kind = match err {
            ActionError::Graphql { .. } => "graphql",
            ActionError::Transport { .. } => "transport",
            ActionError::Decode { .. } => "decode",
        };
        assert_eq!(kind, expected);
    }
}
