//! HTTP API tests

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use outpost_agent::deploy::DeploymentManager;
use outpost_agent::models::service::ActualState;
use outpost_agent::server::auth::Credentials;
use outpost_agent::server::serve::router;
use outpost_agent::server::state::ServerState;

use crate::fakes::{record, FakeAdapter, FakeStore};

struct TestApp {
    router: Router,
    store: Arc<FakeStore>,
}

fn app_with(store: FakeStore, adapter: FakeAdapter, credentials: Option<Credentials>) -> TestApp {
    let store = Arc::new(store);
    let manager = DeploymentManager::new(store.clone(), Arc::new(adapter), "0.1.0");
    let state = Arc::new(ServerState::new(Arc::new(manager), credentials));
    TestApp {
        router: router(state),
        store,
    }
}

fn app() -> TestApp {
    app_with(FakeStore::default(), FakeAdapter::default(), None)
}

fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass)))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_list_deployments() {
    let test = app();
    test.store.insert(record(1, "wp", &["wp-pod"], r#"{"name":"wp"}"#));

    let (status, body) = send(&test.router, get("/deployments")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 1, "name": "wp", "redeployable": true, "service_ids": ["wp-pod"]}])
    );
}

#[tokio::test]
async fn test_create_deployment() {
    let test = app();

    let (status, body) = send(
        &test.router,
        post_json(
            "/deployments",
            json!({"template": {"name": "stack", "images": [{"name": "web"}, {"name": "db"}]}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "stack");
    assert_eq!(body["service_ids"], json!(["web-pod", "db-pod"]));
    assert_eq!(test.store.ids(), vec![1]);
}

#[tokio::test]
async fn test_create_rejects_malformed_blueprint() {
    let test = app();

    let (status, _) = send(
        &test.router,
        post_json(
            "/deployments",
            json!({"template": {"images": [{"deployment": {"count": "lots"}}]}}),
        ),
    )
    .await;

    assert!(status.is_client_error());
    assert!(test.store.ids().is_empty());
}

#[tokio::test]
async fn test_show_deployment_with_service_states() {
    let mut adapter = FakeAdapter::default();
    adapter
        .states
        .insert("wp-pod".to_string(), ActualState::Reported("running".to_string()));
    let test = app_with(FakeStore::default(), adapter, None);
    test.store.insert(record(2, "wp", &["wp-pod", "db-pod"], ""));

    let (status, body) = send(&test.router, get("/deployments/2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": 2,
            "name": "wp",
            "redeployable": false,
            "status": {"services": [
                {"id": "wp-pod", "actualState": "running"},
                {"id": "db-pod", "actualState": "not found"}
            ]}
        })
    );
}

#[tokio::test]
async fn test_missing_deployment_is_404() {
    let test = app();

    let (status, body) = send(&test.router, get("/deployments/9")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "deployment '9' not found"}));
}

#[tokio::test]
async fn test_non_numeric_id_is_400() {
    let test = app();

    let response = test
        .router
        .clone()
        .oneshot(get("/deployments/abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_deployment() {
    let test = app();
    test.store.insert(record(3, "wp", &["wp-pod"], ""));

    let request = Request::builder()
        .method("DELETE")
        .uri("/deployments/3")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&test.router, request).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert!(test.store.ids().is_empty());
}

#[tokio::test]
async fn test_delete_adapter_failure_is_502() {
    let adapter = FakeAdapter {
        fail_delete: Some("wp-pod".to_string()),
        ..Default::default()
    };
    let test = app_with(FakeStore::default(), adapter, None);
    test.store.insert(record(3, "wp", &["wp-pod"], ""));

    let request = Request::builder()
        .method("DELETE")
        .uri("/deployments/3")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&test.router, request).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("wp-pod"));
    assert_eq!(test.store.ids(), vec![3]);
}

#[tokio::test]
async fn test_redeploy_deployment() {
    let test = app();
    test.store.insert(record(
        4,
        "fooya",
        &["wp-pod"],
        r#"{"name":"fooya","images":[{"name":"wp"}]}"#,
    ));

    let (status, body) = send(&test.router, post_json("/deployments/4/redeploy", json!({}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 5);
    assert_eq!(body["name"], "fooya");
    assert_eq!(test.store.ids(), vec![5]);
}

#[tokio::test]
async fn test_redeploy_without_template_is_422() {
    let test = app();
    test.store.insert(record(4, "legacy", &["wp-pod"], ""));

    let (status, _) = send(&test.router, post_json("/deployments/4/redeploy", json!({}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(test.store.ids(), vec![4]);
}

#[tokio::test]
async fn test_metadata() {
    let adapter = FakeAdapter {
        metadata: Some(json!({"version": "0.3", "type": "Kubernetes", "isHealthy": true})),
        ..Default::default()
    };
    let test = app_with(FakeStore::default(), adapter, None);

    let (status, body) = send(&test.router, get("/metadata")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agent"]["version"], "0.1.0");
    assert_eq!(body["adapter"]["type"], "Kubernetes");
}

#[tokio::test]
async fn test_metadata_without_adapter() {
    let test = app();

    let (status, body) = send(&test.router, get("/metadata")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"agent": {"version": "0.1.0"}, "adapter": null}));
}

#[tokio::test]
async fn test_basic_auth_required_when_configured() {
    let credentials = Credentials::new("admin", SecretString::from("secret".to_string()));
    let test = app_with(FakeStore::default(), FakeAdapter::default(), Some(credentials));

    let response = test
        .router
        .clone()
        .oneshot(get("/deployments"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[header::WWW_AUTHENTICATE],
        "Basic realm=\"outpost-agent\""
    );

    let wrong = Request::builder()
        .uri("/deployments")
        .header(header::AUTHORIZATION, auth_header("admin", "guess"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&test.router, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let right = Request::builder()
        .uri("/deployments")
        .header(header::AUTHORIZATION, auth_header("admin", "secret"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&test.router, right).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
