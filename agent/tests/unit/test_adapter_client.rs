//! Adapter HTTP client tests

use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;

use outpost_agent::adapter::{encode_images, AdapterClient, HttpAdapterClient};
use outpost_agent::errors::AgentError;
use outpost_agent::models::service::ActualState;
use outpost_api::Image;

fn client(server: &Server) -> HttpAdapterClient {
    HttpAdapterClient::new(&server.url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_create_services_returns_services_in_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/services")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!([{"name": "wp"}, {"name": "db"}])))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!([{"id": "wp-pod"}, {"id": "db-pod", "actualState": "pending"}]).to_string())
        .create_async()
        .await;

    let images = vec![
        Image {
            name: "wp".to_string(),
            ..Default::default()
        },
        Image {
            name: "db".to_string(),
            ..Default::default()
        },
    ];
    let services = client(&server)
        .create_services(encode_images(&images).unwrap())
        .await
        .unwrap();

    let ids: Vec<&str> = services.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["wp-pod", "db-pod"]);
    assert_eq!(
        services[1].actual_state,
        ActualState::Reported("pending".to_string())
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_services_requires_201() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/services")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let err = client(&server)
        .create_services(b"[]".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::AdapterError(_)));
    assert_eq!(
        err.to_string(),
        "Failed to create services, resp code: 200, body: []"
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_service_decodes_state() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/services/wp-pod")
        .with_status(200)
        .with_body(json!({"id": "wp-pod", "actualState": "running"}).to_string())
        .create_async()
        .await;

    let svc = client(&server).get_service("wp-pod").await.unwrap();

    assert_eq!(svc.id, "wp-pod");
    assert_eq!(svc.actual_state.to_string(), "running");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_service_maps_statuses_in_band() {
    let mut server = Server::new_async().await;
    let missing = server
        .mock("GET", "/v1/services/gone")
        .with_status(404)
        .create_async()
        .await;
    let broken = server
        .mock("GET", "/v1/services/broken")
        .with_status(500)
        .with_body("kaboom")
        .create_async()
        .await;

    let adapter = client(&server);
    let gone = adapter.get_service("gone").await.unwrap();
    let failed = adapter.get_service("broken").await.unwrap();

    assert_eq!(gone.id, "gone");
    assert_eq!(gone.actual_state, ActualState::NotFound);
    assert_eq!(failed.id, "broken");
    assert_eq!(failed.actual_state, ActualState::Error);
    missing.assert_async().await;
    broken.assert_async().await;
}

#[tokio::test]
async fn test_get_service_transport_failure_is_an_error() {
    let adapter = HttpAdapterClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();

    let result = adapter.get_service("wp-pod").await;
    assert!(matches!(result, Err(AgentError::HttpError(_))));
}

#[tokio::test]
async fn test_delete_service() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("DELETE", "/v1/services/wp-pod")
        .with_status(204)
        .create_async()
        .await;
    let refused = server
        .mock("DELETE", "/v1/services/db-pod")
        .with_status(500)
        .with_body("busy")
        .create_async()
        .await;

    let adapter = client(&server);
    adapter.delete_service("wp-pod").await.unwrap();
    let err = adapter.delete_service("db-pod").await.unwrap_err();

    assert!(err.to_string().contains("resp code: 500"));
    assert!(err.to_string().contains("busy"));
    ok.assert_async().await;
    refused.assert_async().await;
}

#[tokio::test]
async fn test_fetch_metadata() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/metadata")
        .with_status(200)
        .with_body(json!({"version": "0.1.0", "type": "Kubernetes", "isHealthy": true}).to_string())
        .create_async()
        .await;

    let metadata = client(&server).fetch_metadata().await.unwrap();

    assert_eq!(metadata["type"], "Kubernetes");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_trailing_slash_in_endpoint() {
    let adapter =
        HttpAdapterClient::new("http://adapter.local:8001/", Duration::from_secs(1)).unwrap();
    assert_eq!(adapter.base_url(), "http://adapter.local:8001/v1");
}
