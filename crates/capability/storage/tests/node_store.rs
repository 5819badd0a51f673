use bridge_storage::{InMemoryNodeDefinitionStore, NodeDefinitionStore};
use domain::NodeDefinition;

#[tokio::test]
async fn insert_rejects_duplicate_node_id() {
    let store = InMemoryNodeDefinitionStore::new();
    store
        .insert(NodeDefinition::new("Temp", "ns=2;s=Temp", "simulation"))
        .await
        .expect("first insert");
    let err = store
        .insert(NodeDefinition::new("Temp2", "ns=2;s=Temp", "simulation"))
        .await
        .expect_err("duplicate");
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn list_enabled_filters_disabled() {
    let mut disabled = NodeDefinition::new("Off", "n-off", "manual");
    disabled.enabled = false;
    let store = InMemoryNodeDefinitionStore::with_definitions(vec![
        NodeDefinition::new("On", "n-on", "manual"),
        disabled,
    ]);
    let enabled = store.list_enabled().await.expect("list");
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].node_id, "n-on");
}

#[tokio::test]
async fn list_all_includes_disabled() {
    let mut disabled = NodeDefinition::new("Off", "n-off", "manual");
    disabled.enabled = false;
    let store = InMemoryNodeDefinitionStore::with_definitions(vec![
        NodeDefinition::new("On", "n-on", "manual"),
        disabled,
    ]);
    let all = store.list_all().await.expect("list all");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn delete_reports_presence() {
    let store =
        InMemoryNodeDefinitionStore::with_definitions(vec![NodeDefinition::new("A", "n-a", "manual")]);
    assert!(store.delete("n-a").await.expect("delete"));
    assert!(!store.delete("n-a").await.expect("second delete"));
    assert!(store.find("n-a").await.expect("find").is_none());
}
