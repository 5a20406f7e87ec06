//! HTTP binding tests.
//!
//! Starts an axum server on an ephemeral port and exercises it with reqwest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use foundation_backend::{api, Api, InMemoryStore};
use serde_json::{json, Value};

use crate::support;

async fn start_server() -> String {
    serve(support::api()).await
}

async fn serve(api: Api<InMemoryStore>) -> String {
    let app = api::router(Arc::new(api));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_check() {
    let base = start_server().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    let resources = body["resources"].as_array().unwrap();
    assert!(resources.iter().any(|r| r == "volunteers"));
}

#[tokio::test]
async fn subscribe_and_list() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/v1/newsletter/subscribe"))
        .json(&json!({ "email": "web@example.org" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "active");

    let resp = client
        .get(format!("{base}/api/v1/newsletter"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn errors_map_to_status_codes() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/v1/unknown"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "unknown_endpoint");

    let resp = client
        .post(format!("{base}/api/v1/donations"))
        .json(&json!({ "name": "x", "email": "x@example.org", "amount": -1, "donationType": "once" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "validation");

    let resp = client
        .get(format!("{base}/api/v1/projects/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn batch_endpoint() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/batch"))
        .json(&json!([
            { "method": "GET", "endpoint": "settings" },
            { "method": "GET", "endpoint": "missing" }
        ]))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body[0]["success"], true);
    assert_eq!(body[1]["success"], false);
}

#[tokio::test]
async fn search_refuses_accounts() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/api/v1/auth/register"))
        .json(&json!({ "name": "W", "email": "w@example.org", "password": "leafy-123" }))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{base}/search"))
        .json(&json!({ "query": "w@", "collections": ["users"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body = resp.text().await.unwrap();
    assert!(!body.contains("password_hash"));
}

#[tokio::test]
async fn slow_requests_do_not_stall_the_runtime() {
    let base = serve(support::api().with_latency(Duration::from_millis(400))).await;
    let client = reqwest::Client::new();

    let slow = tokio::spawn({
        let client = client.clone();
        let url = format!("{base}/api/v1/projects");
        async move { client.get(url).send().await.unwrap().status() }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(started.elapsed() < Duration::from_millis(300));

    assert_eq!(slow.await.unwrap(), 200);
}
