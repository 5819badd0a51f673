//! 协议服务器能力抽象。
//!
//! 线协议本身（会话建立、二进制编码、订阅机制）是外部协作方；
//! 这里定义桥接子系统消费的最小接口：
//! - [`ProtocolServer`]：地址空间操作 + 端点生命周期
//! - [`ProtocolServerFactory`]：每次 setup 构造全新实例（重启不残留状态）
//! - [`SessionAuthorizer`]：协议会话层回调的鉴权挂载点
//! - [`in_memory`]：内存实现（测试与演示用）

pub mod in_memory;

use async_trait::async_trait;
use domain::{Permission, Principal, ScalarValue, ValueType};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

pub use in_memory::{InMemoryProtocolFactory, InMemoryProtocolServer};

/// 协议变量句柄。
pub type VariableHandle = u64;

/// 协议层错误。
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("endpoint configuration error: {0}")]
    Config(String),
    #[error("address space error: {0}")]
    AddressSpace(String),
    #[error("unknown variable handle: {0}")]
    UnknownHandle(VariableHandle),
    #[error("endpoint not bound")]
    NotBound,
}

/// 协议节点标识。
///
/// 结构化形态对应 `ns=<n>;s=<id>` 语法；Local 形态是限定在
/// 本地命名空间内的不透明字符串。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeId {
    Structured { namespace: u16, identifier: String },
    Local(String),
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structured { namespace, identifier } => write!(f, "ns={};s={}", namespace, identifier),
            Self::Local(identifier) => write!(f, "{}", identifier),
        }
    }
}

/// 端点安全策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityPolicy {
    NoSecurity,
    Basic256Sha256Sign,
    Basic256Sha256SignEncrypt,
}

/// 端点配置（setup 时一次性下发）。
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub server_name: String,
    pub endpoint_url: String,
    pub application_uri: String,
    /// 证书/私钥路径由外部加密协作方产出，这里只透传。
    pub certificate_path: Option<PathBuf>,
    pub private_key_path: Option<PathBuf>,
    pub security_policies: Vec<SecurityPolicy>,
    pub allow_anonymous_tokens: bool,
}

/// 协议会话鉴权挂载点。
///
/// 协议服务器在客户端会话认证时回调；实现方每次重新解析，
/// 不缓存任何角色状态。
#[async_trait]
pub trait SessionAuthorizer: Send + Sync {
    /// username 为 None 表示匿名尝试。返回 None 拒绝会话。
    async fn authenticate(&self, username: Option<&str>, password: &str) -> Option<Principal>;

    /// 主体可用的协议操作权限集。
    fn permissions(&self, principal: &Principal) -> HashSet<Permission>;
}

/// 协议服务器能力契约。
#[async_trait]
pub trait ProtocolServer: Send + Sync {
    /// 下发端点配置（bind 之前调用）。
    async fn configure(&self, config: EndpointConfig) -> Result<(), ProtocolError>;

    /// 挂载会话鉴权器。
    async fn set_session_authorizer(&self, authorizer: Arc<dyn SessionAuthorizer>);

    /// 注册命名空间，返回索引。
    async fn register_namespace(&self, uri: &str) -> Result<u16, ProtocolError>;

    /// 在地址空间中创建文件夹。
    async fn add_folder(
        &self,
        parent: Option<VariableHandle>,
        name: &str,
    ) -> Result<VariableHandle, ProtocolError>;

    /// 创建协议变量。
    async fn add_variable(
        &self,
        parent: Option<VariableHandle>,
        node_id: &NodeId,
        name: &str,
        initial: ScalarValue,
        value_type: ValueType,
    ) -> Result<VariableHandle, ProtocolError>;

    async fn set_writable(&self, handle: VariableHandle, writable: bool) -> Result<(), ProtocolError>;

    async fn write_value(&self, handle: VariableHandle, value: ScalarValue) -> Result<(), ProtocolError>;

    async fn read_value(&self, handle: VariableHandle) -> Result<ScalarValue, ProtocolError>;

    /// 从地址空间撤除变量。尽力而为：外部实现不支持时返回 Ok(false)。
    async fn remove_variable(&self, handle: VariableHandle) -> Result<bool, ProtocolError>;

    /// 绑定监听端点。
    async fn bind(&self) -> Result<(), ProtocolError>;

    /// 释放监听端点。
    async fn shutdown(&self) -> Result<(), ProtocolError>;

    /// 当前活跃会话数。
    async fn active_sessions(&self) -> usize;
}

/// 协议服务器工厂。
///
/// 生命周期每次 setup 都通过工厂取全新实例，保证重启后
/// 地址空间不残留上一轮的节点。
pub trait ProtocolServerFactory: Send + Sync {
    fn create(&self) -> Arc<dyn ProtocolServer>;
}
