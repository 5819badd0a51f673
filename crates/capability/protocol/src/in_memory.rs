//! 协议服务器内存实现
//!
//! 仅用于本地演示和测试：地址空间是一张句柄表，
//! bind/shutdown 只翻转标志位，不产生真实会话。

use crate::{
    EndpointConfig, NodeId, ProtocolError, ProtocolServer, ProtocolServerFactory, SessionAuthorizer,
    VariableHandle,
};
use async_trait::async_trait;
use domain::{ScalarValue, ValueType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

struct VariableEntry {
    node_id: Option<NodeId>,
    name: String,
    value: ScalarValue,
    value_type: ValueType,
    writable: bool,
    is_folder: bool,
}

#[derive(Default)]
struct AddressSpace {
    namespaces: Vec<String>,
    variables: HashMap<VariableHandle, VariableEntry>,
    next_handle: VariableHandle,
    config: Option<EndpointConfig>,
    bound: bool,
}

impl AddressSpace {
    fn allocate(&mut self) -> VariableHandle {
        self.next_handle += 1;
        self.next_handle
    }
}

/// 协议服务器内存实现。
#[derive(Default)]
pub struct InMemoryProtocolServer {
    space: RwLock<AddressSpace>,
    authorizer: RwLock<Option<Arc<dyn SessionAuthorizer>>>,
}

impl InMemoryProtocolServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按协议标识查找句柄（测试用）。
    pub async fn handle_of(&self, node_id: &NodeId) -> Option<VariableHandle> {
        let space = self.space.read().await;
        space
            .variables
            .iter()
            .find(|(_, entry)| entry.node_id.as_ref() == Some(node_id))
            .map(|(handle, _)| *handle)
    }

    /// 当前地址空间内变量数（不含文件夹，测试用）。
    pub async fn variable_count(&self) -> usize {
        let space = self.space.read().await;
        space.variables.values().filter(|entry| !entry.is_folder).count()
    }

    /// 当前挂载的鉴权器（测试用）。
    pub async fn session_authorizer(&self) -> Option<Arc<dyn SessionAuthorizer>> {
        self.authorizer.read().await.clone()
    }
}

#[async_trait]
impl ProtocolServer for InMemoryProtocolServer {
    async fn configure(&self, config: EndpointConfig) -> Result<(), ProtocolError> {
        if config.endpoint_url.is_empty() {
            return Err(ProtocolError::Config("empty endpoint url".to_string()));
        }
        let mut space = self.space.write().await;
        space.config = Some(config);
        Ok(())
    }

    async fn set_session_authorizer(&self, authorizer: Arc<dyn SessionAuthorizer>) {
        *self.authorizer.write().await = Some(authorizer);
    }

    async fn register_namespace(&self, uri: &str) -> Result<u16, ProtocolError> {
        let mut space = self.space.write().await;
        if let Some(index) = space.namespaces.iter().position(|existing| existing == uri) {
            // 命名空间索引从 1 起（0 保留给基础命名空间）
            return Ok((index + 1) as u16);
        }
        space.namespaces.push(uri.to_string());
        Ok(space.namespaces.len() as u16)
    }

    async fn add_folder(
        &self,
        _parent: Option<VariableHandle>,
        name: &str,
    ) -> Result<VariableHandle, ProtocolError> {
        let mut space = self.space.write().await;
        let handle = space.allocate();
        space.variables.insert(
            handle,
            VariableEntry {
                node_id: None,
                name: name.to_string(),
                value: ScalarValue::Text(String::new()),
                value_type: ValueType::String,
                writable: false,
                is_folder: true,
            },
        );
        Ok(handle)
    }

    async fn add_variable(
        &self,
        _parent: Option<VariableHandle>,
        node_id: &NodeId,
        name: &str,
        initial: ScalarValue,
        value_type: ValueType,
    ) -> Result<VariableHandle, ProtocolError> {
        let mut space = self.space.write().await;
        let duplicate = space
            .variables
            .values()
            .any(|entry| entry.node_id.as_ref() == Some(node_id));
        if duplicate {
            return Err(ProtocolError::AddressSpace(format!(
                "node id already present: {}",
                node_id
            )));
        }
        let handle = space.allocate();
        space.variables.insert(
            handle,
            VariableEntry {
                node_id: Some(node_id.clone()),
                name: name.to_string(),
                value: initial,
                value_type,
                writable: false,
                is_folder: false,
            },
        );
        debug!(target: "bridge.protocol", "added variable {} ({})", name, node_id);
        Ok(handle)
    }

    async fn set_writable(&self, handle: VariableHandle, writable: bool) -> Result<(), ProtocolError> {
        let mut space = self.space.write().await;
        let entry = space
            .variables
            .get_mut(&handle)
            .ok_or(ProtocolError::UnknownHandle(handle))?;
        entry.writable = writable;
        Ok(())
    }

    async fn write_value(&self, handle: VariableHandle, value: ScalarValue) -> Result<(), ProtocolError> {
        let mut space = self.space.write().await;
        let entry = space
            .variables
            .get_mut(&handle)
            .ok_or(ProtocolError::UnknownHandle(handle))?;
        entry.value = value;
        Ok(())
    }

    async fn read_value(&self, handle: VariableHandle) -> Result<ScalarValue, ProtocolError> {
        let space = self.space.read().await;
        space
            .variables
            .get(&handle)
            .map(|entry| entry.value.clone())
            .ok_or(ProtocolError::UnknownHandle(handle))
    }

    async fn remove_variable(&self, handle: VariableHandle) -> Result<bool, ProtocolError> {
        let mut space = self.space.write().await;
        Ok(space.variables.remove(&handle).is_some())
    }

    async fn bind(&self) -> Result<(), ProtocolError> {
        let mut space = self.space.write().await;
        if space.config.is_none() {
            return Err(ProtocolError::Config("bind before configure".to_string()));
        }
        space.bound = true;
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ProtocolError> {
        let mut space = self.space.write().await;
        space.bound = false;
        Ok(())
    }

    async fn active_sessions(&self) -> usize {
        0
    }
}

/// 内存协议服务器工厂。
#[derive(Debug, Default)]
pub struct InMemoryProtocolFactory;

impl ProtocolServerFactory for InMemoryProtocolFactory {
    fn create(&self) -> Arc<dyn ProtocolServer> {
        Arc::new(InMemoryProtocolServer::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_node_id_rejected() {
        let server = InMemoryProtocolServer::new();
        let node_id = NodeId::Local("sensor-1".to_string());
        server
            .add_variable(None, &node_id, "A", ScalarValue::Float(0.0), ValueType::Float)
            .await
            .expect("first add");
        let err = server
            .add_variable(None, &node_id, "B", ScalarValue::Float(0.0), ValueType::Float)
            .await
            .expect_err("duplicate");
        assert!(err.to_string().contains("already present"));
    }

    #[tokio::test]
    async fn write_then_read_roundtrip() {
        let server = InMemoryProtocolServer::new();
        let node_id = NodeId::Structured {
            namespace: 2,
            identifier: "Temp".to_string(),
        };
        let handle = server
            .add_variable(None, &node_id, "Temp", ScalarValue::Float(0.0), ValueType::Float)
            .await
            .expect("add");
        server
            .write_value(handle, ScalarValue::Float(21.5))
            .await
            .expect("write");
        assert_eq!(
            server.read_value(handle).await.expect("read"),
            ScalarValue::Float(21.5)
        );
    }

    #[tokio::test]
    async fn bind_requires_configuration() {
        let server = InMemoryProtocolServer::new();
        assert!(server.bind().await.is_err());
    }

    #[tokio::test]
    async fn remove_variable_reports_presence() {
        let server = InMemoryProtocolServer::new();
        let node_id = NodeId::Local("gone".to_string());
        let handle = server
            .add_variable(None, &node_id, "G", ScalarValue::Int(0), ValueType::Int32)
            .await
            .expect("add");
        assert!(server.remove_variable(handle).await.expect("remove"));
        assert!(!server.remove_variable(handle).await.expect("second remove"));
    }
}
