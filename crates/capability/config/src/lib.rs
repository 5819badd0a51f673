//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
///
/// 协议端点本身的参数（名称、端口、命名空间、轮询周期）走设置
/// 存储，可在运行期改并随重启生效；这里只放进程级的静态配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub certificate_path: Option<String>,
    pub private_key_path: Option<String>,
    /// 进程启动时是否自动拉起协议服务器。
    pub auto_start: bool,
    /// 是否预置演示节点（空存储时的本地演示）。
    pub seed_demo_nodes: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = env::var("BRIDGE_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let certificate_path = read_optional("BRIDGE_CERT_PATH");
        let private_key_path = read_optional("BRIDGE_KEY_PATH");
        if certificate_path.is_some() != private_key_path.is_some() {
            return Err(ConfigError::Invalid(
                "BRIDGE_CERT_PATH/BRIDGE_KEY_PATH".to_string(),
                "certificate and key must be configured together".to_string(),
            ));
        }
        let auto_start = read_bool_with_default("BRIDGE_AUTO_START", true);
        let seed_demo_nodes = read_bool_with_default("BRIDGE_DEMO_NODES", false);

        Ok(Self {
            http_addr,
            certificate_path,
            private_key_path,
            auto_start,
            seed_demo_nodes,
        })
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
