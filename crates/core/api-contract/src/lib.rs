//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 量程换算配置（字符串字段与持久化形态一致）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingDto {
    pub enabled: bool,
    #[serde(default)]
    pub raw_min: Option<String>,
    #[serde(default)]
    pub raw_max: Option<String>,
    pub eng_min: String,
    pub eng_max: String,
    #[serde(default)]
    pub unit: Option<String>,
}

/// 节点创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodeRequest {
    pub name: String,
    pub node_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub value_type: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
    pub source_kind: String,
    #[serde(default)]
    pub source_params: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    #[serde(default)]
    pub initial_value: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub scaling: Option<ScalingDto>,
}

/// 节点更新请求体（整体替换语义，node_id 取路径参数）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNodeRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub value_type: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
    pub source_kind: String,
    #[serde(default)]
    pub source_params: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    #[serde(default)]
    pub initial_value: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub scaling: Option<ScalingDto>,
}

/// 节点返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDto {
    pub name: String,
    pub node_id: String,
    pub parent_id: Option<String>,
    pub value_type: String,
    pub access: String,
    pub source_kind: String,
    pub source_params: serde_json::Map<String, serde_json::Value>,
    pub poll_interval_ms: u64,
    pub initial_value: Option<String>,
    pub enabled: bool,
    pub scaling: Option<ScalingDto>,
}

/// 实时值返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveValueDto {
    pub node_id: String,
    pub name: String,
    pub value: serde_json::Value,
    pub raw_value: serde_json::Value,
    pub error: Option<String>,
    pub source_kind: String,
    pub value_type: String,
    pub scale_unit: Option<String>,
}

/// 手动写值请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteValueRequest {
    pub value: serde_json::Value,
}

/// 服务器状态返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatusDto {
    pub state: String,
    pub endpoint: Option<String>,
    pub active_sessions: usize,
    pub node_count: usize,
}

/// 服务器设置整体读写结构。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDto {
    pub settings: HashMap<String, String>,
}

/// 凭据校验请求体（诊断用）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCheckRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// 凭据校验返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalDto {
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// 指标返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    pub poll_ticks: u64,
    pub values_published: u64,
    pub read_failures: u64,
    pub write_forwards: u64,
    pub write_failures: u64,
    pub coercion_fallbacks: u64,
    pub scaling_fallbacks: u64,
    pub auth_success: u64,
    pub auth_failure: u64,
    pub server_starts: u64,
    pub server_stops: u64,
}
