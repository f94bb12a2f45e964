//! Tests for server construction.

use super::*;
use actix_web::{http::StatusCode, test};
use rstest::{fixture, rstest};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

fn app_dependencies(health_state: web::Data<HealthState>) -> AppDependencies {
    let page_cache = PageCache::new();
    let endpoint = local_graphql_endpoint(SocketAddr::from(([127, 0, 0, 1], 9)))
        .expect("valid endpoint");
    let http_state = build_http_state(
        endpoint,
        std::time::Duration::from_secs(1),
        &page_cache,
    )
    .expect("http state");
    AppDependencies {
        health_state,
        http_state: web::Data::new(http_state),
        schema: web::Data::new(build_graphql_schema(None)),
    }
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    bind_address: SocketAddr,
) {
    assert!(!health_state.is_ready(), "state should start unready");

    let running = create_server(health_state.clone(), ServerConfig::new(bind_address))
        .expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
    assert_ne!(running.local_addr.port(), 0, "port 0 resolves on bind");
}

#[rstest]
#[actix_rt::test]
async fn app_serves_probes_graphql_and_trace_headers(health_state: web::Data<HealthState>) {
    health_state.mark_ready();
    let app = test::init_service(build_app(app_dependencies(health_state))).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("trace-id"));

    let req = test::TestRequest::post()
        .uri("/api/graphql")
        .set_json(serde_json::json!({ "query": "{ users { id } }" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["users"], serde_json::json!([]));
}

#[rstest]
#[actix_rt::test]
async fn unreachable_actions_render_the_load_error(health_state: web::Data<HealthState>) {
    let app = test::init_service(build_app(app_dependencies(health_state))).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("Error loading users: "));
}
