//! 节点定义内存存储实现
//!
//! 使用 RwLock + HashMap 提供线程安全的内存存储，保持插入无序。

use crate::error::StorageError;
use crate::traits::NodeDefinitionStore;
use domain::NodeDefinition;
use std::collections::HashMap;

/// 节点定义内存存储。
#[derive(Default)]
pub struct InMemoryNodeDefinitionStore {
    nodes: std::sync::RwLock<HashMap<String, NodeDefinition>>,
}

impl InMemoryNodeDefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一组定义（演示与测试用）。
    pub fn with_definitions(definitions: Vec<NodeDefinition>) -> Self {
        let mut nodes = HashMap::new();
        for definition in definitions {
            nodes.insert(definition.node_id.clone(), definition);
        }
        Self {
            nodes: std::sync::RwLock::new(nodes),
        }
    }

    fn guard_poisoned<T>(result: Result<T, impl std::fmt::Display>) -> Result<T, StorageError> {
        result.map_err(|err| StorageError::new(format!("node store lock poisoned: {}", err)))
    }
}

#[async_trait::async_trait]
impl NodeDefinitionStore for InMemoryNodeDefinitionStore {
    async fn list_enabled(&self) -> Result<Vec<NodeDefinition>, StorageError> {
        let nodes = Self::guard_poisoned(self.nodes.read())?;
        Ok(nodes.values().filter(|n| n.enabled).cloned().collect())
    }

    async fn list_all(&self) -> Result<Vec<NodeDefinition>, StorageError> {
        let nodes = Self::guard_poisoned(self.nodes.read())?;
        Ok(nodes.values().cloned().collect())
    }

    async fn find(&self, node_id: &str) -> Result<Option<NodeDefinition>, StorageError> {
        let nodes = Self::guard_poisoned(self.nodes.read())?;
        Ok(nodes.get(node_id).cloned())
    }

    async fn insert(&self, definition: NodeDefinition) -> Result<(), StorageError> {
        let mut nodes = Self::guard_poisoned(self.nodes.write())?;
        if nodes.contains_key(&definition.node_id) {
            return Err(StorageError::new(format!(
                "node_id already exists: {}",
                definition.node_id
            )));
        }
        nodes.insert(definition.node_id.clone(), definition);
        Ok(())
    }

    async fn update(&self, definition: NodeDefinition) -> Result<bool, StorageError> {
        let mut nodes = Self::guard_poisoned(self.nodes.write())?;
        if !nodes.contains_key(&definition.node_id) {
            return Ok(false);
        }
        nodes.insert(definition.node_id.clone(), definition);
        Ok(true)
    }

    async fn delete(&self, node_id: &str) -> Result<bool, StorageError> {
        let mut nodes = Self::guard_poisoned(self.nodes.write())?;
        Ok(nodes.remove(node_id).is_some())
    }
}
