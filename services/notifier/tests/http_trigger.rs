//! HttpTrigger against a local endpoint

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use notifier::{HttpTrigger, NotificationTrigger, NotifyError};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone)]
struct Endpoint {
    hits: Arc<AtomicUsize>,
    status: StatusCode,
}

async fn notifications(
    State(endpoint): State<Endpoint>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    endpoint.hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    assert_eq!(body, json!({}));

    if endpoint.status.is_success() {
        (endpoint.status, Json(json!({ "success": true, "due": 0 })))
    } else {
        (endpoint.status, Json(json!({ "success": false, "msg": "down" })))
    }
}

async fn serve(status: StatusCode) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/users/notifications", post(notifications))
        .with_state(Endpoint {
            hits: hits.clone(),
            status,
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api/users/notifications"), hits)
}

#[tokio::test]
async fn posts_empty_json_object() {
    let (url, hits) = serve(StatusCode::OK).await;
    let trigger = HttpTrigger::new(url, Duration::from_secs(5)).unwrap();

    let delivery = trigger.fire().await.unwrap();
    assert_eq!(delivery.status, 200);
    assert!(delivery.body.contains("\"success\":true"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_error_is_reported_not_retried() {
    let (url, hits) = serve(StatusCode::INTERNAL_SERVER_ERROR).await;
    let trigger = HttpTrigger::new(url, Duration::from_secs(5)).unwrap();

    let err = trigger.fire().await.unwrap_err();
    match err {
        NotifyError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("down"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let trigger = HttpTrigger::new(
        format!("http://{addr}/api/users/notifications"),
        Duration::from_secs(2),
    )
    .unwrap();

    assert!(matches!(
        trigger.fire().await.unwrap_err(),
        NotifyError::Transport(_)
    ));
}
