#![cfg(feature = "server")]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, StatusCode, header},
};
use futures::StreamExt;
use profile_feed::{
    Bridge, Config,
    profiles::{MemoryStore, ProfileStore},
    server::{AppState, router},
};
use tokio::time::timeout;
use tower::ServiceExt;

const WAIT: Duration = Duration::from_secs(2);
const ORIGIN: &str = "http://localhost:3000";

fn test_app() -> (Router, Arc<Bridge>) {
    let bridge = Bridge::builder(Config::default()).build();
    let store: Arc<dyn ProfileStore> = Arc::new(MemoryStore::new());
    let app = router(
        AppState::new(store, Arc::clone(&bridge)),
        Some(HeaderValue::from_static(ORIGIN)),
    );
    (app, bridge)
}

fn post_profile(email: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/profiles")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::json!({ "email": email }).to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_create_then_fetch() {
    let (app, bridge) = test_app();

    let resp = app.clone().oneshot(post_profile("new@email.com")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(location.starts_with("/profiles/"));

    let resp = app.clone().oneshot(get(&location)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let profile = json_body(resp).await;
    assert_eq!(profile["email"], "new@email.com");
    assert_eq!(format!("/profiles/{}", profile["id"].as_str().unwrap()), location);

    let resp = app.oneshot(get("/profiles")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let all = json_body(resp).await;
    assert_eq!(all.as_array().map(Vec::len), Some(1));

    bridge.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_create_publishes_to_subscribers() {
    let (app, bridge) = test_app();
    let mut sub = bridge.subscribe();

    let resp = app.oneshot(post_profile("feed@email.com")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers()[header::LOCATION].to_str().unwrap().to_string();

    let ev = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert_eq!(format!("/profiles/{}", ev.profile_id()), location);
    assert_eq!(ev.profile.email, "feed@email.com");

    bridge.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_email_is_bad_request() {
    let (app, bridge) = test_app();
    let mut sub = bridge.subscribe();

    let resp = app.oneshot(post_profile("   ")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["code"], "invalid_email");

    bridge.shutdown().await.unwrap();
    assert!(sub.recv().await.is_none(), "no event for a failed create");
}

#[tokio::test]
async fn test_unknown_profile_is_not_found() {
    let (app, bridge) = test_app();

    let resp = app.oneshot(get("/profiles/does-not-exist")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["code"], "not_found");

    bridge.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sse_streams_created_profiles() {
    let (app, bridge) = test_app();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/sse/profiles")
                .header(header::ORIGIN, ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/event-stream"
    );
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN].to_str().unwrap(),
        ORIGIN
    );
    assert_eq!(bridge.subscriber_count(), 1);

    let created = app.oneshot(post_profile("sse@email.com")).await.unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let mut body = resp.into_body().into_data_stream();
    let chunk = timeout(WAIT, body.next()).await.unwrap().unwrap().unwrap();
    let text = String::from_utf8(chunk.to_vec()).unwrap();
    let data = text
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .unwrap();
    assert!(
        !text.lines().any(|line| line.starts_with("id:")),
        "sse frames carry no id field: {text}"
    );
    let frame: serde_json::Value = serde_json::from_str(data).unwrap();
    assert_eq!(frame["profile"]["email"], "sse@email.com");
    assert!(frame["seq"].is_u64());
    assert!(frame["timestamp"].as_u64().unwrap() > 0);

    drop(body);
    assert_eq!(bridge.subscriber_count(), 0, "client gone, subscription detached");
    bridge.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sse_stream_ends_on_shutdown() {
    let (app, bridge) = test_app();

    let resp = app.oneshot(get("/sse/profiles")).await.unwrap();
    let mut body = resp.into_body().into_data_stream();

    bridge.shutdown().await.unwrap();
    let end = timeout(WAIT, body.next()).await.unwrap();
    assert!(end.is_none());
}

#[tokio::test]
async fn test_ws_route_requires_upgrade() {
    let (app, bridge) = test_app();

    let resp = app.oneshot(get("/ws/profiles")).await.unwrap();
    assert!(resp.status().is_client_error());
    assert_eq!(bridge.subscriber_count(), 0);

    bridge.shutdown().await.unwrap();
}
