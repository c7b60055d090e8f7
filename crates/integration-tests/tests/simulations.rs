mod harness;

use harness::config::ConfigBuilder;
use harness::server::TestServer;
use serde_json::{Value, json};

async fn post(server: &TestServer, path: &str, body: Value) -> (u16, Value) {
    let resp = server.client().post(server.url(path)).json(&body).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn get(server: &TestServer, path: &str) -> (u16, Value) {
    let resp = server.client().get(server.url(path)).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn cpu_simulation_lifecycle() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let (status, created) = post(
        &server,
        "/api/simulations/cpu",
        json!({"targetLoadPercent": "80", "durationSeconds": 120}),
    )
    .await;
    assert_eq!(status, 202);
    assert_eq!(created["type"], "cpu_stress");
    assert_eq!(created["status"], "running");
    assert_eq!(created["parameters"], json!({"targetLoadPercent": 80, "durationSeconds": 120}));

    let id = created["id"].as_str().unwrap().to_owned();

    let (status, fetched) = get(&server, &format!("/api/simulations/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["id"], created["id"]);

    let resp = server
        .client()
        .delete(server.url(&format!("/api/simulations/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let stopped: Value = resp.json().await.unwrap();
    assert_eq!(stopped["status"], "stopped");

    let (_, listed) = get(&server, "/api/simulations").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_field_is_required() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let (status, body) = post(&server, "/api/simulations/cpu", json!({"targetLoadPercent": 50})).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "durationSeconds is required");
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let (status, body) = post(&server, "/api/simulations/slow", json!([1, 2, 3])).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "ValidationError");
    assert_eq!(body["message"], "Invalid slow request parameters");
}

#[tokio::test]
async fn blocking_workers_are_lenient() {
    let config = ConfigBuilder::new().with_blocking_workers(3, 8).build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = post(
        &server,
        "/api/simulations/blocking",
        json!({"durationSeconds": 5, "concurrentWorkers": -5}),
    )
    .await;
    assert_eq!(status, 202);
    assert_eq!(body["parameters"]["concurrentWorkers"], 3);

    let (status, body) = post(
        &server,
        "/api/simulations/blocking",
        json!({"durationSeconds": 5, "concurrentWorkers": 500}),
    )
    .await;
    assert_eq!(status, 202);
    assert_eq!(body["parameters"]["concurrentWorkers"], 8);
}

#[tokio::test]
async fn slow_request_pattern_defaults_to_sleep() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let (status, body) = post(
        &server,
        "/api/simulations/slow",
        json!({"delaySeconds": 2, "blockingPattern": "teleport"}),
    )
    .await;
    assert_eq!(status, 202);
    assert_eq!(body["parameters"]["blockingPattern"], "sleep");
}

#[tokio::test]
async fn invalid_id_is_validation_error() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let (status, body) = get(&server, "/api/simulations/not-a-uuid").await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "id must be a valid UUID");
    assert_eq!(body["details"]["received"], "not-a-uuid");
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let id = "123e4567-e89b-12d3-a456-426614174000";
    let (status, body) = get(&server, &format!("/api/simulations/{id}")).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NotFoundError");
    assert_eq!(body["message"], "Simulation not found");
    assert_eq!(body["details"]["id"], id);
}

#[tokio::test]
async fn event_limit_comes_from_query() {
    let server = TestServer::start(ConfigBuilder::new().with_event_capacity(10).build()).await.unwrap();

    for size in [16, 32, 64] {
        let (status, _) = post(&server, "/api/simulations/memory", json!({"sizeMb": size})).await;
        assert_eq!(status, 202);
    }

    let (status, events) = get(&server, "/api/events?limit=2").await;
    assert_eq!(status, 200);
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "started");
    assert_eq!(events[0]["simulationType"], "memory_pressure");

    let (_, events) = get(&server, "/api/events").await;
    assert_eq!(events.as_array().unwrap().len(), 3);

    let (status, body) = get(&server, "/api/events?limit=11").await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "limit must be between 1 and 10");

    let (status, body) = get(&server, "/api/events?limit=lots").await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "limit must be a number");
}
