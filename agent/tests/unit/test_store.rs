//! SQLite deployment store tests

use outpost_agent::errors::AgentError;
use outpost_agent::models::deployment::Deployment;
use outpost_agent::storage::deployments::{DeploymentStore, SqliteStore};

async fn memory_store() -> SqliteStore {
    SqliteStore::connect("sqlite::memory:").await.unwrap()
}

fn deployment(name: &str) -> Deployment {
    Deployment {
        id: 0,
        name: name.to_string(),
        service_ids: r#"["a-pod"]"#.to_string(),
        template: format!(r#"{{"name":"{}"}}"#, name),
    }
}

#[tokio::test]
async fn test_save_assigns_increasing_ids() {
    let store = memory_store().await;

    let mut first = deployment("first");
    let mut second = deployment("second");
    store.save(&mut first).await.unwrap();
    store.save(&mut second).await.unwrap();

    assert!(first.id > 0);
    assert!(second.id > first.id);
    assert_eq!(store.find_by_id(second.id).await.unwrap(), second);
}

#[tokio::test]
async fn test_all_lists_rows_in_id_order() {
    let store = memory_store().await;
    for name in ["a", "b", "c"] {
        store.save(&mut deployment(name)).await.unwrap();
    }

    let names: Vec<String> = store
        .all()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_remove_deletes_row() {
    let store = memory_store().await;
    let mut d = deployment("doomed");
    store.save(&mut d).await.unwrap();

    store.remove(d.id).await.unwrap();

    assert!(store.all().await.unwrap().is_empty());
    // Removing again is not an error
    store.remove(d.id).await.unwrap();
}

#[tokio::test]
async fn test_ids_are_not_reused_after_remove() {
    let store = memory_store().await;
    let mut first = deployment("first");
    store.save(&mut first).await.unwrap();
    store.remove(first.id).await.unwrap();

    let mut second = deployment("second");
    store.save(&mut second).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_find_missing_is_not_found() {
    let store = memory_store().await;

    let err = store.find_by_id(99).await.unwrap_err();
    assert!(matches!(err, AgentError::NotFound(_)));
    assert_eq!(err.to_string(), "deployment '99' not found");
}

#[tokio::test]
async fn test_empty_columns_round_trip() {
    let store = memory_store().await;
    let mut d = Deployment {
        name: "bare".to_string(),
        ..Default::default()
    };
    store.save(&mut d).await.unwrap();

    let loaded = store.find_by_id(d.id).await.unwrap();
    assert_eq!(loaded.template, "");
    assert!(!loaded.to_lite().redeployable);
    assert!(loaded.to_lite().service_ids.is_empty());
}

#[tokio::test]
async fn test_file_database_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("agent.db").display());

    let store = SqliteStore::connect(&url).await.unwrap();
    store.save(&mut deployment("persisted")).await.unwrap();
    drop(store);

    let reopened = SqliteStore::connect(&url).await.unwrap();
    assert_eq!(reopened.all().await.unwrap()[0].name, "persisted");
}
