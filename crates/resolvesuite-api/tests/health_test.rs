//! Health, connection gate, and routing integration tests.
//!
//! Run with: `cargo test -p resolvesuite-api --test health_test`

mod helpers;

use std::future::IntoFuture;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use futures::future::join_all;
use helpers::{
    setup_test_app, setup_test_app_with, setup_test_app_with_options, Backend, TestOptions,
    TEST_FRONTEND_URL,
};
use resolvesuite_api::DomainRoutes;
use resolvesuite_core::DeploymentMode;
use serde_json::Value;

#[tokio::test]
async fn test_root_banner() {
    let app = setup_test_app(Backend::Unconfigured);

    let response = app.client().get("/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "ResolveSuite API is running");
}

#[tokio::test]
async fn test_health_reports_ready_connection() {
    let app = setup_test_app(Backend::Ready);
    app.client().get("/").await.assert_status_ok();

    let response = app.client().get("/api/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["database"], "ready");
}

#[tokio::test]
async fn test_health_stays_up_when_database_fails() {
    let app = setup_test_app(Backend::Unconfigured);
    app.client().get("/").await.assert_status_ok();

    let response = app.client().get("/api/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
    assert_ne!(body["database"], "ready");
}

#[tokio::test]
async fn test_health_does_not_wait_for_database() {
    let app = setup_test_app(Backend::Hanging);

    let response = tokio::time::timeout(
        Duration::from_secs(2),
        app.client().get("/api/health").into_future(),
    )
    .await
    .expect("health answers while the connection attempt hangs");

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["database"], "connecting");
}

#[tokio::test]
async fn test_health_starts_the_connection_attempt() {
    let app = setup_test_app(Backend::Ready);
    let mut states = app.state.db.subscribe();

    app.client().get("/api/health").await.assert_status_ok();

    tokio::time::timeout(Duration::from_secs(2), states.wait_for(|s| s.is_ready()))
        .await
        .expect("attempt started by the health route completes")
        .unwrap();
    assert_eq!(app.connect_attempts(), 1);
}

#[tokio::test]
async fn test_readiness_unavailable_without_database() {
    let app = setup_test_app(Backend::Unconfigured);

    let response = app.client().get("/api/health/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "not_ready");
}

#[tokio::test]
async fn test_readiness_unavailable_when_database_unreachable() {
    // The lazy pool points at a closed port, so SELECT 1 cannot succeed.
    let app = setup_test_app(Backend::Ready);

    let response = app.client().get("/api/health/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_gate_connects_once_across_concurrent_requests() {
    let app = setup_test_app(Backend::Ready);
    let client = app.client();

    let responses = join_all((0..16).map(|_| client.get("/").into_future())).await;
    for response in responses {
        response.assert_status_ok();
    }
    client.get("/api/health/ready").await;
    client.get("/api/health").await.assert_status_ok();

    assert_eq!(app.connect_attempts(), 1);
    let calls = app.connector_calls.as_ref().unwrap();
    assert_eq!(calls.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_gate_retries_on_next_request_after_failure() {
    let app = setup_test_app(Backend::Unconfigured);

    app.client().get("/").await.assert_status_ok();
    app.client().get("/").await.assert_status_ok();

    assert_eq!(app.connect_attempts(), 2);
}

#[tokio::test]
async fn test_cors_allows_frontend_origin_with_credentials() {
    let app = setup_test_app(Backend::Unconfigured);

    let response = app
        .client()
        .get("/api/health")
        .add_header("Origin", TEST_FRONTEND_URL)
        .await;

    assert_eq!(
        response.header("access-control-allow-origin"),
        TEST_FRONTEND_URL
    );
    assert_eq!(response.header("access-control-allow-credentials"), "true");
}

#[tokio::test]
async fn test_cors_preflight_skips_connection_gate() {
    let app = setup_test_app(Backend::Unconfigured);

    let response = app
        .client()
        .method(Method::OPTIONS, "/api/complaints/attachments")
        .add_header("Origin", TEST_FRONTEND_URL)
        .add_header("Access-Control-Request-Method", "POST")
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        TEST_FRONTEND_URL
    );
    assert_eq!(app.connect_attempts(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app(Backend::Unconfigured);

    let response = app.client().get("/api/nowhere").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("/api/nowhere"));
}

#[tokio::test]
async fn test_unregistered_domain_service_is_not_implemented() {
    let app = setup_test_app(Backend::Unconfigured);

    for path in ["/api/workflows", "/api/complaints/types/3", "/api/complaints/17"] {
        let response = app.client().get(path).await;
        response.assert_status(StatusCode::NOT_IMPLEMENTED);
        let body: Value = response.json();
        assert_eq!(body["code"], "NOT_IMPLEMENTED");
    }
}

async fn list_users() -> Json<Value> {
    Json(serde_json::json!({ "users": [] }))
}

async fn explode() -> &'static str {
    panic!("collaborator exploded")
}

#[tokio::test]
async fn test_registered_domain_service_is_mounted() {
    let domains = DomainRoutes::new()
        .register("users", Router::new().route("/", get(list_users)))
        .register("feedback", Router::new().route("/boom", get(explode)));
    let app = setup_test_app_with(Backend::Unconfigured, domains);

    let response = app.client().get("/api/users").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["users"].as_array().unwrap().is_empty());

    // Registered services own their namespace; unmatched paths are plain 404s.
    app.client()
        .get("/api/users/missing")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_handler_panic_becomes_uniform_500() {
    let domains = DomainRoutes::new().register("feedback", Router::new().route("/boom", get(explode)));
    let app = setup_test_app_with(Backend::Unconfigured, domains);

    let response = app.client().get("/api/feedback/boom").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["code"], "INTERNAL_ERROR");

    // The server keeps serving after the panic.
    app.client().get("/").await.assert_status_ok();
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = setup_test_app(Backend::Unconfigured);

    let response = app.client().get("/api/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/api/complaints/attachments"].is_object());
    assert!(body["paths"]["/api/health"].is_object());
}

#[tokio::test]
async fn test_production_hides_server_error_detail() {
    let domains =
        DomainRoutes::new().register("feedback", Router::new().route("/boom", get(explode)));
    let app = setup_test_app_with_options(
        Backend::Unconfigured,
        TestOptions {
            mode: DeploymentMode::Production,
            domains,
            ..TestOptions::default()
        },
    );

    let response = app.client().get("/api/feedback/boom").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["message"], "An unexpected error occurred");
    assert_eq!(body["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_development_shows_server_error_detail() {
    let domains =
        DomainRoutes::new().register("feedback", Router::new().route("/boom", get(explode)));
    let app = setup_test_app_with(Backend::Unconfigured, domains);

    let response = app.client().get("/api/feedback/boom").await;

    let body: Value = response.json();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("collaborator exploded"));
}
