//! 节点注册表集成测试：内存协议服务器 + 模拟模式硬件目录。

use bridge_protocol::{InMemoryProtocolServer, NodeId, ProtocolServer};
use bridge_registry::{NodeRegistry, RegistryError};
use bridge_source::{SourceFactory, UnavailableCatalog};
use domain::{NodeDefinition, ScalarValue};
use std::sync::Arc;

async fn registry() -> (Arc<InMemoryProtocolServer>, NodeRegistry) {
    let server = Arc::new(InMemoryProtocolServer::new());
    let root = server.add_folder(None, "Sensors").await.expect("root folder");
    let factory = Arc::new(SourceFactory::new(Arc::new(UnavailableCatalog)));
    let registry = NodeRegistry::new(server.clone(), factory, 2, root);
    (server, registry)
}

fn simulation_node(node_id: &str) -> NodeDefinition {
    let mut definition = NodeDefinition::new("Sim", node_id, "simulation");
    definition
        .source_params
        .insert("sim_type".to_string(), serde_json::Value::String("random".to_string()));
    definition
}

#[tokio::test]
async fn add_registers_source_and_variable() {
    let (server, registry) = registry().await;
    registry.add(simulation_node("ns=2;s=Sim.1")).await.expect("add");

    assert!(registry.contains("ns=2;s=Sim.1").await);
    assert_eq!(server.variable_count().await, 1);
    let node_id = NodeId::Structured {
        namespace: 2,
        identifier: "Sim.1".to_string(),
    };
    assert!(server.handle_of(&node_id).await.is_some());
}

#[tokio::test]
async fn duplicate_add_is_rejected() {
    let (_server, registry) = registry().await;
    registry.add(simulation_node("dup")).await.expect("first add");
    let err = registry.add(simulation_node("dup")).await.expect_err("duplicate");
    assert!(matches!(err, RegistryError::Duplicate(_)));
}

#[tokio::test]
async fn unknown_source_kind_leaves_registry_unchanged() {
    let (server, registry) = registry().await;
    let definition = NodeDefinition::new("Bogus", "bogus-1", "carrier-pigeon");
    let err = registry.add(definition).await.expect_err("unknown kind");
    assert!(matches!(err, RegistryError::Source(_)));

    // 无孤儿协议变量，无半注册条目
    assert!(!registry.contains("bogus-1").await);
    assert_eq!(server.variable_count().await, 0);
}

#[tokio::test]
async fn remove_retracts_variable_and_stops_exposure() {
    let (server, registry) = registry().await;
    registry.add(simulation_node("gone")).await.expect("add");
    registry.remove("gone").await.expect("remove");

    assert!(!registry.contains("gone").await);
    assert_eq!(server.variable_count().await, 0);
    assert!(registry.live_values().await.is_empty());

    let err = registry.remove("gone").await.expect_err("second remove");
    assert!(matches!(err, RegistryError::UnknownNode(_)));
}

#[tokio::test]
async fn update_writes_coerced_value() {
    let (server, registry) = registry().await;
    let mut definition = simulation_node("temp");
    definition.value_type = domain::ValueType::Int32;
    registry.add(definition).await.expect("add");

    registry
        .update("temp", ScalarValue::Float(21.9))
        .await
        .expect("update");

    // 未限定的标识落在注册命名空间下
    let handle = server
        .handle_of(&NodeId::Structured {
            namespace: 2,
            identifier: "temp".to_string(),
        })
        .await
        .expect("handle");
    assert_eq!(server.read_value(handle).await.expect("read"), ScalarValue::Int(21));
}

#[tokio::test]
async fn apply_sample_records_raw_and_publishes_value() {
    let (_server, registry) = registry().await;
    registry.add(simulation_node("boiler")).await.expect("add");

    registry
        .apply_sample("boiler", Some(ScalarValue::Float(512.0)), Some(ScalarValue::Float(51.2)))
        .await
        .expect("apply");

    let values = registry.live_values().await;
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].raw_value, Some(ScalarValue::Float(512.0)));
    assert_eq!(values[0].value, Some(ScalarValue::Float(51.2)));
}

#[tokio::test]
async fn apply_sample_without_value_keeps_last_published() {
    let (_server, registry) = registry().await;
    registry.add(simulation_node("hold")).await.expect("add");

    registry
        .apply_sample("hold", Some(ScalarValue::Float(1.0)), Some(ScalarValue::Float(1.0)))
        .await
        .expect("first apply");
    // 故障哨兵：原始读数清空，协议侧保持最近一次已知值
    registry.apply_sample("hold", None, None).await.expect("sentinel");

    let values = registry.live_values().await;
    assert_eq!(values[0].raw_value, None);
    assert_eq!(values[0].value, Some(ScalarValue::Float(1.0)));
}

#[tokio::test]
async fn apply_sample_on_removed_node_reports_unknown() {
    let (_server, registry) = registry().await;
    registry.add(simulation_node("racy")).await.expect("add");
    registry.remove("racy").await.expect("remove");

    let err = registry
        .apply_sample("racy", Some(ScalarValue::Float(0.0)), Some(ScalarValue::Float(0.0)))
        .await
        .expect_err("removed");
    assert!(matches!(err, RegistryError::UnknownNode(_)));
}

#[tokio::test]
async fn update_definition_replaces_node() {
    let (server, registry) = registry().await;
    registry.add(simulation_node("swap")).await.expect("add");

    let mut replacement = simulation_node("swap");
    replacement.name = "Swapped".to_string();
    replacement.value_type = domain::ValueType::Boolean;
    registry.update_definition(replacement).await.expect("replace");

    assert_eq!(server.variable_count().await, 1);
    let values = registry.live_values().await;
    assert_eq!(values[0].name, "Swapped");
    assert_eq!(values[0].value_type, "Boolean");
}

#[tokio::test]
async fn update_definition_failure_leaves_node_absent() {
    let (server, registry) = registry().await;
    registry.add(simulation_node("fragile")).await.expect("add");

    // 替换定义引用未知数据源类别：旧节点已撤下且不回滚
    let replacement = NodeDefinition::new("Fragile", "fragile", "carrier-pigeon");
    let err = registry.update_definition(replacement).await.expect_err("bad kind");
    assert!(matches!(err, RegistryError::Source(_)));

    assert!(!registry.contains("fragile").await);
    assert_eq!(server.variable_count().await, 0);
}

#[tokio::test]
async fn forward_write_reaches_manual_source() {
    let (_server, registry) = registry().await;
    let definition = NodeDefinition::new("Setpoint", "sp", "manual");
    registry.add(definition).await.expect("add");

    registry
        .forward_write("sp", &ScalarValue::Float(42.0))
        .await
        .expect("forward write");
}

#[tokio::test]
async fn analog_write_rejection_propagates() {
    let (_server, registry) = registry().await;
    let definition = NodeDefinition::new("Adc", "adc", "ads1115");
    registry.add(definition).await.expect("add");

    let err = registry
        .forward_write("adc", &ScalarValue::Float(1.0))
        .await
        .expect_err("adc is read-only");
    assert!(matches!(err, RegistryError::Source(_)));
}
