use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use muster_attendance::config::RoutingConfig;
use muster_attendance::infra::routing::DistanceMatrixClient;
use muster_attendance::router::build_router;
use muster_attendance::state::AppState;

/// Router over a disconnected database: only paths that fail or finish
/// before touching the store are exercised here.
fn app() -> axum::Router {
    let routing = DistanceMatrixClient::new(RoutingConfig {
        base_url: "http://127.0.0.1:9/json".to_owned(),
        api_key: None,
        timeout: Duration::from_millis(100),
        max_retries: 0,
        initial_backoff: Duration::from_millis(1),
    })
    .unwrap();
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        routing,
    })
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn should_answer_liveness_with_request_id() {
    let resp = app()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_echo_caller_request_id() {
    let resp = app()
        .oneshot(
            Request::get("/healthz")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let resp = app()
        .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_render_unknown_route_as_json_404() {
    let resp = app()
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn should_require_student_id_header() {
    let resp = app()
        .oneshot(Request::post("/generate-otp").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = json_body(resp).await;
    assert_eq!(json["kind"], "INVALID_INPUT");
    assert_eq!(json["message"], "missing student-id header");
}

#[tokio::test]
async fn should_require_otp_code_header() {
    let resp = app()
        .oneshot(Request::post("/validate-otp").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "invalid input: missing otp-code header");
}

#[tokio::test]
async fn should_reject_malformed_attendance_timestamp() {
    let body = r#"{"check_in":true,"check_in_lat":1.3,"check_in_long":103.8,"timestamp":"yesterday"}"#;
    let resp = app()
        .oneshot(
            Request::post("/attendance")
                .header("student-id", "5")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["kind"], "INVALID_INPUT");
}

#[tokio::test]
async fn should_compute_punctuality() {
    let body = r#"{
        "check_type": "checkin",
        "scheduled_check_in": "2026-10-16T09:00:00+08:00",
        "actual_check_in": "2026-10-16T09:07:40+08:00"
    }"#;
    let resp = app()
        .oneshot(
            Request::post("/validate-attendance")
                .header("student-id", "5")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["minutes_difference"], 8);
}

#[tokio::test]
async fn should_reject_unknown_check_type() {
    let body = r#"{"check_type":"lunch"}"#;
    let resp = app()
        .oneshot(
            Request::post("/validate-attendance")
                .header("student-id", "5")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["kind"], "INVALID_INPUT");
}
