//! 服务器生命周期。
//!
//! 协议端点 + 节点注册表 + 轮询任务作为一个整体启停：
//! - Stopped → Starting → Running：setup 从设置与节点定义组装全新
//!   协议服务器实例（工厂创建，重启不残留上一轮地址空间）
//! - Running → Stopping → Stopped：协作式停机，轮询任务在有界
//!   等待内自行退出，超时才强制中止
//!
//! 启停操作串行化；setup 中任何致命失败都回退到 Stopped，
//! 单个节点注册失败不致命（记日志后继续）。

pub mod identity;

use bridge_protocol::{
    EndpointConfig, ProtocolError, ProtocolServer, ProtocolServerFactory, SecurityPolicy,
    SessionAuthorizer,
};
use bridge_registry::{LiveValue, NodeRegistry, RegistryError};
use bridge_scheduler::{Poller, PollerConfig};
use bridge_source::SourceFactory;
use bridge_storage::{NodeDefinitionStore, SettingStore, StorageError, settings};
use domain::{NodeDefinition, ScalarValue};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use identity::{EndpointIdentity, FileIdentity, IdentityProvider, NoIdentity};

/// 停机最长等待时长与检查步长。
const STOP_WAIT_MAX: Duration = Duration::from_secs(5);
const STOP_WAIT_STEP: Duration = Duration::from_millis(100);

/// 生命周期状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Stopping => "Stopping",
        }
    }
}

/// 生命周期错误。
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("operation {operation} not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// 对外状态视图。
#[derive(Debug, Clone)]
pub struct ServerStatus {
    pub state: &'static str,
    pub endpoint: Option<String>,
    pub active_sessions: usize,
    pub node_count: usize,
}

/// 一轮运行期持有的全部组件。
struct ServerRuntime {
    server: Arc<dyn ProtocolServer>,
    registry: Arc<NodeRegistry>,
    poller: Arc<Poller>,
    poll_handle: JoinHandle<()>,
    endpoint: String,
}

struct LifecycleInner {
    state: LifecycleState,
    runtime: Option<ServerRuntime>,
}

/// 服务器生命周期控制器。
pub struct ServerLifecycle {
    factory: Arc<dyn ProtocolServerFactory>,
    sources: Arc<SourceFactory>,
    definitions: Arc<dyn NodeDefinitionStore>,
    settings: Arc<dyn SettingStore>,
    authorizer: Arc<dyn SessionAuthorizer>,
    identity: Arc<dyn IdentityProvider>,
    inner: tokio::sync::Mutex<LifecycleInner>,
}

impl ServerLifecycle {
    pub fn new(
        factory: Arc<dyn ProtocolServerFactory>,
        sources: Arc<SourceFactory>,
        definitions: Arc<dyn NodeDefinitionStore>,
        settings: Arc<dyn SettingStore>,
        authorizer: Arc<dyn SessionAuthorizer>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            factory,
            sources,
            definitions,
            settings,
            authorizer,
            identity,
            inner: tokio::sync::Mutex::new(LifecycleInner {
                state: LifecycleState::Stopped,
                runtime: None,
            }),
        }
    }

    /// 启动：组装全新协议服务器实例并拉起轮询任务。
    pub async fn start(&self) -> Result<(), LifecycleError> {
        {
            let mut inner = self.inner.lock().await;
            if inner.state != LifecycleState::Stopped {
                return Err(LifecycleError::InvalidState {
                    operation: "start",
                    state: inner.state.as_str(),
                });
            }
            inner.state = LifecycleState::Starting;
        }

        match self.setup().await {
            Ok(runtime) => {
                let endpoint = runtime.endpoint.clone();
                let mut inner = self.inner.lock().await;
                inner.runtime = Some(runtime);
                inner.state = LifecycleState::Running;
                bridge_telemetry::record_server_start();
                info!(target: "bridge.server", "server running at {}", endpoint);
                Ok(())
            }
            Err(err) => {
                let mut inner = self.inner.lock().await;
                inner.runtime = None;
                inner.state = LifecycleState::Stopped;
                warn!(target: "bridge.server", "startup failed: {}", err);
                Err(err)
            }
        }
    }

    /// 停止：协作式停机。已停止时为幂等空操作。
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let runtime = {
            let mut inner = self.inner.lock().await;
            match inner.state {
                LifecycleState::Running => {
                    inner.state = LifecycleState::Stopping;
                    inner.runtime.take()
                }
                LifecycleState::Stopped => {
                    debug!(target: "bridge.server", "stop requested while already stopped");
                    return Ok(());
                }
                state => {
                    return Err(LifecycleError::InvalidState {
                        operation: "stop",
                        state: state.as_str(),
                    });
                }
            }
        };

        if let Some(runtime) = runtime {
            runtime.poller.request_stop();
            let mut waited = Duration::ZERO;
            while !runtime.poll_handle.is_finished() && waited < STOP_WAIT_MAX {
                tokio::time::sleep(STOP_WAIT_STEP).await;
                waited += STOP_WAIT_STEP;
            }
            if runtime.poll_handle.is_finished() {
                debug!(target: "bridge.server", "poller exited after {:?}", waited);
            } else {
                // 停机不强制：停止标志已清，任务最晚在下一次 tick 检查处退出
                warn!(
                    target: "bridge.server",
                    "poller did not exit within {:?}, proceeding with shutdown", STOP_WAIT_MAX
                );
            }
            if let Err(err) = runtime.server.shutdown().await {
                warn!(target: "bridge.server", "endpoint shutdown reported error: {}", err);
            }
        }

        let mut inner = self.inner.lock().await;
        inner.state = LifecycleState::Stopped;
        bridge_telemetry::record_server_stop();
        info!(target: "bridge.server", "server stopped");
        Ok(())
    }

    /// 重启 = stop + start。
    pub async fn restart(&self) -> Result<(), LifecycleError> {
        self.stop().await?;
        self.start().await
    }

    pub async fn state(&self) -> LifecycleState {
        self.inner.lock().await.state
    }

    pub async fn status(&self) -> ServerStatus {
        let inner = self.inner.lock().await;
        match &inner.runtime {
            Some(runtime) => ServerStatus {
                state: inner.state.as_str(),
                endpoint: Some(runtime.endpoint.clone()),
                active_sessions: runtime.server.active_sessions().await,
                node_count: runtime.registry.len().await,
            },
            None => ServerStatus {
                state: inner.state.as_str(),
                endpoint: None,
                active_sessions: 0,
                node_count: 0,
            },
        }
    }

    /// 新增节点：先挂到运行中的注册表（校验数据源类别），
    /// 成功后再持久化定义。停止状态只持久化。
    pub async fn add_node(&self, definition: NodeDefinition) -> Result<(), LifecycleError> {
        if let Some(registry) = self.registry().await {
            registry.add(definition.clone()).await?;
            if let Err(err) = self.definitions.insert(definition.clone()).await {
                // 持久化失败时撤掉刚挂上的节点，两边保持一致
                if let Err(rollback) = registry.remove(&definition.node_id).await {
                    warn!(
                        target: "bridge.server",
                        "rollback after persist failure also failed for {}: {}",
                        definition.node_id, rollback
                    );
                }
                return Err(err.into());
            }
            return Ok(());
        }
        self.definitions.insert(definition).await?;
        Ok(())
    }

    /// 删除节点：持久层与运行期注册表同时撤下。
    pub async fn remove_node(&self, node_id: &str) -> Result<bool, LifecycleError> {
        let existed = self.definitions.delete(node_id).await?;
        if let Some(registry) = self.registry().await {
            match registry.remove(node_id).await {
                Ok(()) => {}
                Err(RegistryError::UnknownNode(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(existed)
    }

    /// 更新节点定义：运行期走 remove + add 重建（非原子，失败时
    /// 节点保持缺失），持久层整体覆盖。
    pub async fn update_node(&self, definition: NodeDefinition) -> Result<bool, LifecycleError> {
        let existed = self.definitions.update(definition.clone()).await?;
        if !existed {
            return Ok(false);
        }
        if let Some(registry) = self.registry().await {
            registry.update_definition(definition).await?;
        }
        Ok(true)
    }

    /// 手动写值（管理面向数据源转发）。
    pub async fn write_node(&self, node_id: &str, value: &ScalarValue) -> Result<(), LifecycleError> {
        let registry = self.registry().await.ok_or(LifecycleError::InvalidState {
            operation: "write_node",
            state: "Stopped",
        })?;
        bridge_telemetry::record_write_forward();
        match registry.forward_write(node_id, value).await {
            Ok(()) => Ok(()),
            Err(err) => {
                bridge_telemetry::record_write_failure();
                Err(err.into())
            }
        }
    }

    /// 实时值列表；停止状态返回空表。
    pub async fn live_values(&self) -> Vec<LiveValue> {
        match self.registry().await {
            Some(registry) => registry.live_values().await,
            None => Vec::new(),
        }
    }

    async fn registry(&self) -> Option<Arc<NodeRegistry>> {
        let inner = self.inner.lock().await;
        inner.runtime.as_ref().map(|runtime| runtime.registry.clone())
    }

    /// 从设置与节点定义组装一轮运行期。
    async fn setup(&self) -> Result<ServerRuntime, LifecycleError> {
        let all_settings = self.settings.all().await?;
        let server_name = settings::value_or_default(&all_settings, settings::SERVER_NAME, "");
        let port = settings::value_or_default(&all_settings, settings::PORT, "4840");
        let namespace_uri = settings::value_or_default(&all_settings, settings::NAMESPACE_URI, "");
        let application_uri = settings::value_or_default(&all_settings, settings::APPLICATION_URI, "");
        let polling_rate = settings::value_or_default(&all_settings, settings::POLLING_RATE, "1000")
            .parse::<u64>()
            .unwrap_or(1000);
        let allow_anonymous = settings::value_or_default(&all_settings, settings::ALLOW_ANONYMOUS, "false")
            .trim()
            .eq_ignore_ascii_case("true");

        let endpoint = format!("opc.tcp://{}:{}/", report_ip(), port);
        let identity = self.identity.identity();
        let security_policies = match identity {
            Some(_) => vec![
                SecurityPolicy::NoSecurity,
                SecurityPolicy::Basic256Sha256Sign,
                SecurityPolicy::Basic256Sha256SignEncrypt,
            ],
            None => vec![SecurityPolicy::NoSecurity],
        };

        let server = self.factory.create();
        server
            .configure(EndpointConfig {
                server_name,
                endpoint_url: endpoint.clone(),
                application_uri,
                certificate_path: identity.as_ref().map(|id| id.certificate_path.clone()),
                private_key_path: identity.as_ref().map(|id| id.private_key_path.clone()),
                security_policies,
                allow_anonymous_tokens: allow_anonymous,
            })
            .await?;
        server.set_session_authorizer(self.authorizer.clone()).await;

        let namespace = server.register_namespace(&namespace_uri).await?;
        let root = server.add_folder(None, "Sensors").await?;
        let registry = Arc::new(NodeRegistry::new(
            server.clone(),
            self.sources.clone(),
            namespace,
            root,
        ));

        let definitions = self.definitions.list_enabled().await?;
        for definition in definitions {
            let node_id = definition.node_id.clone();
            if let Err(err) = registry.add(definition).await {
                // 单个节点注册失败不拖垮整轮启动
                warn!(target: "bridge.server", "skipping node {}: {}", node_id, err);
            }
        }

        if let Err(err) = server.bind().await {
            let _ = server.shutdown().await;
            return Err(err.into());
        }

        let poller = Arc::new(Poller::new(
            registry.clone(),
            self.definitions.clone(),
            PollerConfig::with_interval_ms(polling_rate),
        ));
        let poll_handle = poller.spawn();

        Ok(ServerRuntime {
            server,
            registry,
            poller,
            poll_handle,
            endpoint,
        })
    }
}

/// 对外通告的本机地址。
///
/// UDP connect 不发包，仅让内核选出默认路由的源地址；
/// 无网络环境回退环回地址。
fn report_ip() -> String {
    std::net::UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}
