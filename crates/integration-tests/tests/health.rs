mod harness;

use harness::config::ConfigBuilder;
use harness::server::TestServer;
use serde_json::{Value, json};

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server.client().get(server.url("/api/health")).send().await.unwrap();

    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn health_endpoint_disabled() {
    let config = ConfigBuilder::new().without_health().build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/api/health")).send().await.unwrap();

    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "NotFoundError");
}

#[tokio::test]
async fn public_config_reflects_limits() {
    let config = ConfigBuilder::new()
        .with_max_memory_mb(4096)
        .with_event_capacity(25)
        .build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/api/config")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["metricsPollIntervalMs"], 500);
    assert_eq!(body["eventLogCapacity"], 25);
    assert_eq!(body["limits"]["maxMemoryMb"], 4096);
    assert_eq!(body["limits"]["maxDurationSeconds"], 86_400);
}
