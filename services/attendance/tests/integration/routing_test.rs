use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

use muster_attendance::config::RoutingConfig;
use muster_attendance::domain::repository::RoutingPort;
use muster_attendance::error::AttendanceServiceError;
use muster_attendance::infra::routing::DistanceMatrixClient;
use muster_domain::geo::Coordinate;

#[derive(Clone)]
struct FakeProvider {
    calls: Arc<AtomicUsize>,
    queries: Arc<std::sync::Mutex<Vec<HashMap<String, String>>>>,
    status: StatusCode,
    body: Value,
    delay: Duration,
}

impl FakeProvider {
    fn new(status: StatusCode, body: Value) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(std::sync::Mutex::new(vec![])),
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

async fn respond(
    State(provider): State<FakeProvider>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    provider.calls.fetch_add(1, Ordering::SeqCst);
    provider.queries.lock().unwrap().push(query);
    tokio::time::sleep(provider.delay).await;
    (provider.status, Json(provider.body.clone()))
}

/// Serve `provider` on an ephemeral port and return its endpoint URL.
async fn spawn(provider: FakeProvider) -> String {
    let app = Router::new()
        .route("/distancematrix/json", get(respond))
        .with_state(provider);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/distancematrix/json")
}

fn config(base_url: String) -> RoutingConfig {
    RoutingConfig {
        base_url,
        api_key: Some("test-key".to_owned()),
        timeout: Duration::from_secs(2),
        max_retries: 2,
        initial_backoff: Duration::from_millis(5),
    }
}

fn ok_body(meters: u32) -> Value {
    json!({
        "status": "OK",
        "origin_addresses": ["a"],
        "destination_addresses": ["b"],
        "rows": [{ "elements": [{
            "status": "OK",
            "distance": { "text": "x", "value": meters },
            "duration": { "text": "y", "value": 60 }
        }]}]
    })
}

async fn route(cfg: RoutingConfig) -> Result<f64, AttendanceServiceError> {
    DistanceMatrixClient::new(cfg)
        .unwrap()
        .routed_meters(Coordinate::new(1.0, 103.0), Coordinate::new(1.001, 103.001))
        .await
}

#[tokio::test]
async fn should_return_routed_distance() {
    let provider = FakeProvider::new(StatusCode::OK, ok_body(412));
    let calls = provider.calls.clone();
    let queries = provider.queries.clone();
    let url = spawn(provider).await;

    let meters = route(config(url)).await.unwrap();

    assert_eq!(meters, 412.0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let queries = queries.lock().unwrap();
    assert_eq!(queries[0]["origins"], "1,103");
    assert_eq!(queries[0]["destinations"], "1.001,103.001");
    assert_eq!(queries[0]["key"], "test-key");
}

#[tokio::test]
async fn should_retry_server_errors_then_fail() {
    let provider = FakeProvider::new(StatusCode::SERVICE_UNAVAILABLE, json!({}));
    let calls = provider.calls.clone();
    let url = spawn(provider).await;

    let result = route(config(url)).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::Upstream(_))),
        "expected Upstream, got {result:?}"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 3, "one attempt plus two retries");
}

#[tokio::test]
async fn should_retry_rate_limiting() {
    let provider = FakeProvider::new(StatusCode::TOO_MANY_REQUESTS, json!({}));
    let calls = provider.calls.clone();
    let url = spawn(provider).await;

    let result = route(config(url)).await;

    assert!(matches!(result, Err(AttendanceServiceError::Upstream(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn should_not_retry_client_errors() {
    let provider = FakeProvider::new(StatusCode::BAD_REQUEST, json!({}));
    let calls = provider.calls.clone();
    let url = spawn(provider).await;

    let result = route(config(url)).await;

    assert!(matches!(result, Err(AttendanceServiceError::Upstream(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn should_not_retry_provider_denial() {
    let provider = FakeProvider::new(
        StatusCode::OK,
        json!({ "status": "REQUEST_DENIED", "error_message": "invalid key", "rows": [] }),
    );
    let calls = provider.calls.clone();
    let url = spawn(provider).await;

    let result = route(config(url)).await;

    assert!(matches!(result, Err(AttendanceServiceError::Upstream(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn should_retry_timeouts() {
    let provider =
        FakeProvider::new(StatusCode::OK, ok_body(10)).with_delay(Duration::from_millis(500));
    let calls = provider.calls.clone();
    let url = spawn(provider).await;
    let cfg = RoutingConfig {
        timeout: Duration::from_millis(50),
        max_retries: 1,
        ..config(url)
    };

    let result = route(cfg).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::Upstream(_))),
        "expected Upstream, got {result:?}"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn should_fail_without_api_key() {
    let provider = FakeProvider::new(StatusCode::OK, ok_body(10));
    let calls = provider.calls.clone();
    let url = spawn(provider).await;
    let cfg = RoutingConfig {
        api_key: None,
        ..config(url)
    };

    let result = route(cfg).await;

    assert!(matches!(result, Err(AttendanceServiceError::Upstream(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn should_fail_when_provider_is_unreachable() {
    // Bind then drop to get a port nobody is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let cfg = RoutingConfig {
        max_retries: 1,
        ..config(format!("http://{addr}/distancematrix/json"))
    };

    let result = route(cfg).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::Upstream(_))),
        "expected Upstream, got {result:?}"
    );
}
