//! 节点注册表能力。
//!
//! 维护逻辑节点标识 →（数据源实例，协议变量句柄，声明类型）的映射：
//! - add：构造数据源 + 创建协议变量，构造失败整体回滚
//! - update：按声明类型强转后写出协议变量
//! - remove：撤下数据源与本地映射，地址空间撤除尽力而为
//! - update_definition：remove + add 两步，显式非原子契约
//!
//! 节点表由请求路径与轮询任务共享；条目整体替换/删除，
//! 轮询方在每个 tick 开始处取稳定的标识快照。

pub mod coerce;
pub mod node_id;

use bridge_protocol::{ProtocolError, ProtocolServer, VariableHandle};
use bridge_source::{DataSource, SourceError, SourceFactory};
use domain::{NodeDefinition, ScalarValue, ValueType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub use coerce::{coerce_initial, coerce_value};
pub use node_id::parse_node_id;

/// 注册表错误。
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("source construction failed: {0}")]
    Source(#[from] SourceError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("unknown node: {0}")]
    UnknownNode(String),
    #[error("node already registered: {0}")]
    Duplicate(String),
}

/// 实时值视图（管理面展示用）。
#[derive(Debug, Clone)]
pub struct LiveValue {
    pub node_id: String,
    pub name: String,
    /// 协议侧当前值（强转与量程换算之后）。
    pub value: Option<ScalarValue>,
    /// 最近一次的原始读数；None 表示未知/故障。
    pub raw_value: Option<ScalarValue>,
    pub error: Option<String>,
    pub source_kind: String,
    pub value_type: &'static str,
    pub scale_unit: Option<String>,
}

struct RegistryEntry {
    definition: NodeDefinition,
    source: Arc<dyn DataSource>,
    handle: VariableHandle,
    value_type: ValueType,
    /// 最近一次原始读数（轮询任务更新；None = 未知/故障）。
    raw: std::sync::Mutex<Option<ScalarValue>>,
}

impl RegistryEntry {
    fn set_raw(&self, raw: Option<ScalarValue>) {
        match self.raw.lock() {
            Ok(mut guard) => *guard = raw,
            Err(poisoned) => *poisoned.into_inner() = raw,
        }
    }

    fn raw_value(&self) -> Option<ScalarValue> {
        self.raw.lock().ok().and_then(|guard| guard.clone())
    }
}

/// 节点注册表。
///
/// 不变式：表内的每个节点标识要么同时持有活跃数据源与协议句柄，
/// 要么完全不存在 —— 半注册状态在 add 内部回滚。
pub struct NodeRegistry {
    server: Arc<dyn ProtocolServer>,
    factory: Arc<SourceFactory>,
    namespace: u16,
    root: VariableHandle,
    entries: RwLock<HashMap<String, Arc<RegistryEntry>>>,
}

impl NodeRegistry {
    pub fn new(
        server: Arc<dyn ProtocolServer>,
        factory: Arc<SourceFactory>,
        namespace: u16,
        root: VariableHandle,
    ) -> Self {
        Self {
            server,
            factory,
            namespace,
            root,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 注册一个节点定义。
    ///
    /// 数据源构造失败是硬失败（节点不注册）；协议变量创建后任何
    /// 一步失败都会尽力撤除该变量，不留孤儿句柄。
    pub async fn add(&self, definition: NodeDefinition) -> Result<VariableHandle, RegistryError> {
        {
            let entries = self.entries.read().await;
            if entries.contains_key(&definition.node_id) {
                return Err(RegistryError::Duplicate(definition.node_id.clone()));
            }
        }

        // 先构造数据源：未知类别在这里硬失败，什么都没有注册
        let source = self.factory.create(&definition)?;

        let node_id = parse_node_id(&definition.node_id, self.namespace);
        let initial = coerce_initial(definition.initial_value.as_deref(), definition.value_type);
        let handle = self
            .server
            .add_variable(Some(self.root), &node_id, &definition.name, initial, definition.value_type)
            .await?;

        if let Err(err) = self.server.set_writable(handle, definition.access.is_writable()).await {
            // 回滚：协议变量已创建，不能留下脱离节点表的孤儿
            if let Err(rollback_err) = self.server.remove_variable(handle).await {
                warn!(
                    target: "bridge.registry",
                    "rollback of orphaned variable {} failed: {}", definition.node_id, rollback_err
                );
            }
            return Err(err.into());
        }

        let key = definition.node_id.clone();
        let value_type = definition.value_type;
        let entry = Arc::new(RegistryEntry {
            definition,
            source,
            handle,
            value_type,
            raw: std::sync::Mutex::new(None),
        });
        self.entries.write().await.insert(key.clone(), entry);
        info!(target: "bridge.registry", "added node {} (handle {})", key, handle);
        Ok(handle)
    }

    /// 按声明类型强转后写出到协议变量。
    pub async fn update(&self, node_id: &str, value: ScalarValue) -> Result<(), RegistryError> {
        let entry = self
            .entry(node_id)
            .await
            .ok_or_else(|| RegistryError::UnknownNode(node_id.to_string()))?;
        let coerced = coerce_value(node_id, &value, entry.value_type);
        self.server.write_value(entry.handle, coerced).await?;
        Ok(())
    }

    /// 轮询路径：记录原始读数并写出换算后的值。
    ///
    /// 节点在快照与落值之间被移除时返回 UnknownNode，调用方按
    /// 节点粒度记日志后继续。
    pub async fn apply_sample(
        &self,
        node_id: &str,
        raw: Option<ScalarValue>,
        value: Option<ScalarValue>,
    ) -> Result<(), RegistryError> {
        let entry = self
            .entry(node_id)
            .await
            .ok_or_else(|| RegistryError::UnknownNode(node_id.to_string()))?;
        entry.set_raw(raw);
        if let Some(value) = value {
            let coerced = coerce_value(node_id, &value, entry.value_type);
            self.server.write_value(entry.handle, coerced).await?;
        }
        // value 为 None：故障哨兵，协议变量保持最近一次已知值
        Ok(())
    }

    /// 把协议客户端的写入转发给节点的数据源。
    pub async fn forward_write(&self, node_id: &str, value: &ScalarValue) -> Result<(), RegistryError> {
        let entry = self
            .entry(node_id)
            .await
            .ok_or_else(|| RegistryError::UnknownNode(node_id.to_string()))?;
        entry.source.write(value).await?;
        Ok(())
    }

    /// 撤下节点：数据源与本地映射立刻销毁，之后不再轮询、不再接受
    /// 写入；地址空间撤除受外部协议实现能力限制，尽力而为。
    pub async fn remove(&self, node_id: &str) -> Result<(), RegistryError> {
        let entry = {
            let mut entries = self.entries.write().await;
            entries
                .remove(node_id)
                .ok_or_else(|| RegistryError::UnknownNode(node_id.to_string()))?
        };
        match self.server.remove_variable(entry.handle).await {
            Ok(true) => debug!(target: "bridge.registry", "variable of {} retracted from address space", node_id),
            Ok(false) => debug!(
                target: "bridge.registry",
                "address space retraction not supported for {}; node stops being polled", node_id
            ),
            Err(err) => warn!(
                target: "bridge.registry",
                "error retracting {} from address space: {}", node_id, err
            ),
        }
        info!(target: "bridge.registry", "removed node {}", node_id);
        Ok(())
    }

    /// 更新定义 = remove + add 两步。
    ///
    /// 显式非原子：remove 成功而 add 失败时节点保持缺失，
    /// 不回滚到旧定义，调用方必须按可失败操作处理。
    pub async fn update_definition(&self, definition: NodeDefinition) -> Result<VariableHandle, RegistryError> {
        match self.remove(&definition.node_id).await {
            Ok(()) => {}
            Err(RegistryError::UnknownNode(_)) => {}
            Err(err) => return Err(err),
        }
        self.add(definition).await
    }

    /// 轮询快照（tick 开始处调用）：标识 + 数据源 + 量程配置。
    pub async fn poll_targets(&self) -> Vec<PollTarget> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .map(|(node_id, entry)| PollTarget {
                node_id: node_id.clone(),
                source: entry.source.clone(),
                scaling: entry.definition.scaling.clone(),
            })
            .collect()
    }

    /// 实时值列表（管理面展示）。
    pub async fn live_values(&self) -> Vec<LiveValue> {
        let entries: Vec<(String, Arc<RegistryEntry>)> = {
            let guard = self.entries.read().await;
            guard.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };
        let mut values = Vec::with_capacity(entries.len());
        for (node_id, entry) in entries {
            let value = self.server.read_value(entry.handle).await.ok();
            values.push(LiveValue {
                node_id,
                name: entry.definition.name.clone(),
                value,
                raw_value: entry.raw_value(),
                error: entry.source.last_error(),
                source_kind: entry.definition.source_kind.clone(),
                value_type: entry.value_type.as_str(),
                scale_unit: entry
                    .definition
                    .scaling
                    .as_ref()
                    .and_then(|spec| spec.unit.clone()),
            });
        }
        values
    }

    pub async fn contains(&self, node_id: &str) -> bool {
        self.entries.read().await.contains_key(node_id)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn entry(&self, node_id: &str) -> Option<Arc<RegistryEntry>> {
        self.entries.read().await.get(node_id).cloned()
    }
}

/// 轮询目标（tick 快照的元素）。
pub struct PollTarget {
    pub node_id: String,
    pub source: Arc<dyn DataSource>,
    pub scaling: Option<domain::ScalingSpec>,
}
