//! Coordinator client tests against a loopback mock coordinator

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};

use memebox::remote::{Coordinator, HttpCoordinator, RemoteError, ReportStatus, WorkItem};

#[derive(Default)]
struct MockRemote {
    batch_status: u16,
    batch_body: String,
    seen_api_keys: Mutex<Vec<String>>,
    completed: Mutex<Vec<(i64, String)>>,
    failed: Mutex<Vec<(i64, String)>>,
    report_status: u16,
}

async fn new_records(State(state): State<Arc<MockRemote>>, Json(body): Json<Value>) -> impl IntoResponse {
    if let Some(key) = body.get("apiKey").and_then(Value::as_str) {
        state.seen_api_keys.lock().unwrap().push(key.to_string());
    }
    (
        StatusCode::from_u16(state.batch_status).unwrap(),
        [("content-type", "application/json")],
        state.batch_body.clone(),
    )
}

async fn mark_complete(State(state): State<Arc<MockRemote>>, Json(body): Json<Value>) -> impl IntoResponse {
    state.completed.lock().unwrap().push((
        body["id"].as_i64().unwrap(),
        body["hash"].as_str().unwrap().to_string(),
    ));
    StatusCode::from_u16(state.report_status).unwrap()
}

async fn mark_failed(State(state): State<Arc<MockRemote>>, Json(body): Json<Value>) -> impl IntoResponse {
    state.failed.lock().unwrap().push((
        body["id"].as_i64().unwrap(),
        body["hash"].as_str().unwrap().to_string(),
    ));
    StatusCode::from_u16(state.report_status).unwrap()
}

/// Serve the mock coordinator on an ephemeral port, returning its base URL
async fn spawn_remote(state: Arc<MockRemote>) -> String {
    let app = Router::new()
        .route("/api/new-records", post(new_records))
        .route("/api/mark-complete", post(mark_complete))
        .route("/api/mark-failed", post(mark_failed))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock remote");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: String) -> HttpCoordinator {
    HttpCoordinator::new(
        base_url,
        "test-key".to_string(),
        Duration::from_secs(2),
        Duration::from_secs(2),
    )
    .unwrap()
}

#[tokio::test]
async fn fetch_batch_returns_items_and_sends_api_key() {
    let state = Arc::new(MockRemote {
        batch_status: 200,
        batch_body: json!([
            {"id": 1, "url": "http://x/a.png", "datetime": "2024-05-01", "hash": "h1"},
            {"id": 2, "url": "http://x/b.jpg", "datetime": "2024-05-02", "hash": "h2"}
        ])
        .to_string(),
        report_status: 200,
        ..Default::default()
    });
    let coordinator = client(spawn_remote(state.clone()).await);

    let batch = coordinator.fetch_batch().await.unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(
        batch[0],
        WorkItem {
            id: 1,
            url: "http://x/a.png".to_string(),
            datetime: "2024-05-01".to_string(),
            hash: "h1".to_string(),
        }
    );
    assert_eq!(
        state.seen_api_keys.lock().unwrap().as_slice(),
        ["test-key".to_string()]
    );
}

#[tokio::test]
async fn fetch_batch_empty_array_is_empty_batch() {
    let state = Arc::new(MockRemote {
        batch_status: 200,
        batch_body: "[]".to_string(),
        report_status: 200,
        ..Default::default()
    });
    let coordinator = client(spawn_remote(state).await);

    let batch = coordinator.fetch_batch().await.unwrap();
    assert!(batch.is_empty());
}

#[tokio::test]
async fn fetch_batch_non_success_is_unavailable() {
    let state = Arc::new(MockRemote {
        batch_status: 500,
        batch_body: "server on fire".to_string(),
        report_status: 200,
        ..Default::default()
    });
    let coordinator = client(spawn_remote(state).await);

    let err = coordinator.fetch_batch().await.unwrap_err();
    assert!(matches!(err, RemoteError::Unavailable(_)));
}

#[tokio::test]
async fn fetch_batch_bad_json_is_malformed() {
    let state = Arc::new(MockRemote {
        batch_status: 200,
        batch_body: "{not json".to_string(),
        report_status: 200,
        ..Default::default()
    });
    let coordinator = client(spawn_remote(state).await);

    let err = coordinator.fetch_batch().await.unwrap_err();
    assert!(matches!(err, RemoteError::Malformed(_)));
}

#[tokio::test]
async fn fetch_batch_unreachable_remote_is_unavailable() {
    // nothing listens here
    let coordinator = client("http://127.0.0.1:1".to_string());
    let err = coordinator.fetch_batch().await.unwrap_err();
    assert!(matches!(err, RemoteError::Unavailable(_)));
}

#[tokio::test]
async fn report_done_delivers_id_and_hash() {
    let state = Arc::new(MockRemote {
        batch_status: 200,
        batch_body: "[]".to_string(),
        report_status: 200,
        ..Default::default()
    });
    let coordinator = client(spawn_remote(state.clone()).await);

    let status = coordinator.report_done(7, "abc123").await;

    assert_eq!(status, ReportStatus::Delivered);
    assert_eq!(
        state.completed.lock().unwrap().as_slice(),
        [(7, "abc123".to_string())]
    );
}

#[tokio::test]
async fn report_failed_non_success_is_undelivered() {
    let state = Arc::new(MockRemote {
        batch_status: 200,
        batch_body: "[]".to_string(),
        report_status: 503,
        ..Default::default()
    });
    let coordinator = client(spawn_remote(state.clone()).await);

    let status = coordinator.report_failed(9, "h9").await;

    assert_eq!(status, ReportStatus::Undelivered);
    // the attempt still reached the coordinator
    assert_eq!(
        state.failed.lock().unwrap().as_slice(),
        [(9, "h9".to_string())]
    );
}
