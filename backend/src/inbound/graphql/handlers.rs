//! Actix handlers serving the GraphQL schema.

use actix_web::http::header;
use actix_web::{Either, HttpResponse, web};
use async_graphql::parser::parse_query;
use async_graphql::parser::types::OperationType;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use serde_json::json;
use tracing::debug;

use super::schema::UserSchema;

/// Mount point for the GraphQL endpoint.
pub const GRAPHQL_PATH: &str = "/api/graphql";

const MUTATION_OVER_GET_MESSAGE: &str = "mutations must be sent with POST";

/// Execute a JSON-encoded GraphQL request.
pub async fn graphql_post(
    schema: web::Data<UserSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

/// Execute a query passed in the query string.
///
/// A document whose selected operation is a mutation is answered with
/// `405 Method Not Allowed` and never executed, so links and embedded
/// resources cannot change data.
pub async fn graphql_get(
    schema: web::Data<UserSchema>,
    request: GraphQLRequest,
) -> Either<GraphQLResponse, HttpResponse> {
    let request = request.into_inner();
    if selects_mutation(&request) {
        debug!(operation = ?request.operation_name, "refusing mutation sent over GET");
        return Either::Right(
            HttpResponse::MethodNotAllowed()
                .insert_header((header::ALLOW, "POST"))
                .json(json!({ "errors": [{ "message": MUTATION_OVER_GET_MESSAGE }] })),
        );
    }
    Either::Left(schema.execute(request).await.into())
}

// Unparsable documents fall through so execution reports the syntax error.
fn selects_mutation(request: &async_graphql::Request) -> bool {
    let Ok(document) = parse_query(&request.query) else {
        return false;
    };
    let selected = request.operation_name.as_deref();
    document.operations.iter().any(|(name, operation)| {
        matches!(operation.node.ty, OperationType::Mutation)
            && selected.is_none_or(|selected| name.is_some_and(|name| name.as_str() == selected))
    })
}

/// Register the endpoint on an Actix service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(GRAPHQL_PATH)
            .route(web::post().to(graphql_post))
            .route(web::get().to(graphql_get)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserDirectoryService;
    use crate::inbound::graphql::build_schema;
    use crate::outbound::persistence::InMemoryUserRepository;
    use actix_web::{App, http::StatusCode, test};
    use mockable::DefaultClock;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use url::form_urlencoded;

    fn schema() -> UserSchema {
        let repository = Arc::new(InMemoryUserRepository::new(Arc::new(DefaultClock)));
        build_schema(Arc::new(UserDirectoryService::new(repository)))
    }

    #[actix_web::test]
    async fn post_executes_mutations() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(schema()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(GRAPHQL_PATH)
            .set_json(json!({
                "query": "mutation($name: String!, $email: String!) { createUser(name: $name, email: $email) { name email } }",
                "variables": { "name": "Ada", "email": "ada@example.com" },
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body["data"]["createUser"],
            json!({ "name": "Ada", "email": "ada@example.com" })
        );
    }

    #[actix_web::test]
    async fn get_executes_queries_from_the_query_string() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(schema()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/graphql?query=%7B%20users%20%7B%20id%20%7D%20%7D")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["users"], json!([]));
    }

    fn get_uri(pairs: &[(&str, &str)]) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        format!("{GRAPHQL_PATH}?{query}")
    }

    #[actix_web::test]
    async fn get_refuses_mutations_without_running_them() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(schema()))
                .configure(configure),
        )
        .await;

        let uri = get_uri(&[(
            "query",
            r#"mutation { createUser(name: "Eve", email: "eve@example.com") { id } }"#,
        )]);
        let res = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            res.headers()
                .get(header::ALLOW)
                .and_then(|value| value.to_str().ok()),
            Some("POST")
        );
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["errors"][0]["message"], MUTATION_OVER_GET_MESSAGE);

        let listed = test::TestRequest::post()
            .uri(GRAPHQL_PATH)
            .set_json(json!({ "query": "{ users { id } }" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, listed).await;
        assert_eq!(body["data"]["users"], json!([]));
    }

    #[actix_web::test]
    async fn get_runs_the_selected_query_beside_a_mutation() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(schema()))
                .configure(configure),
        )
        .await;

        let uri = get_uri(&[
            (
                "query",
                r#"query List { users { id } } mutation Wipe { deleteUser(id: "1") }"#,
            ),
            ("operationName", "List"),
        ]);
        let res = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["users"], json!([]));
    }
}
