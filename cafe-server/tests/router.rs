//! Router-level tests: requests go straight into the app without a socket

use axum::body::{Body, to_bytes};
use cafe_server::auth::JwtConfig;
use cafe_server::{Config, ServerState, build_app};
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

async fn app() -> (tempfile::TempDir, axum::Router) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.jwt = JwtConfig::generated();
    config.auth_delay_ms = 0;
    let state = ServerState::initialize(&config).await.expect("state");
    (dir, build_app(state))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, request_id, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn test_health_reports_database() {
    let (_dir, app) = app().await;

    let (status, request_id, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(request_id.is_some());

    let (status, _, body) = send(app, get("/health/detailed")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["tables"]["reservations"], 0);
    assert_eq!(body["tables"]["admin"], 0);
    assert_eq!(body["backlog"]["pending_messages"], 0);
}

#[tokio::test]
async fn test_unknown_table_is_404() {
    let (_dir, app) = app().await;
    let (status, _, body) = send(app, get("/rest/orders")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
    assert_eq!(body["details"]["table"], "orders");
}

#[tokio::test]
async fn test_malformed_filter_is_400() {
    let (_dir, app) = app().await;
    let (status, _, body) = send(app.clone(), get("/rest/products?price=between.1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3003);

    let (status, _, _) = send(app, get("/rest/products?stock=gt.many")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_select_with_ordering() {
    let (_dir, app) = app().await;
    let (status, _, body) = send(
        app,
        get("/rest/categories?is_active=eq.true&order=sort_order.asc&limit=5"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_me_requires_token() {
    let (_dir, app) = app().await;
    let (status, _, body) = send(app, get("/api/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
}
