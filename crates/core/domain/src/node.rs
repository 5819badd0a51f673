//! 节点定义领域模型。
//!
//! 节点定义由存储协作方持久化，这里只消费：
//! - NodeDefinition：一个协议数据点的完整配置
//! - ScalingSpec：模拟量量程换算配置（字段保持持久化字符串形态）
//! - AccessMode：协议侧访问权限

use crate::value::ValueType;

/// 节点访问权限。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

impl AccessMode {
    /// 从持久化字符串解析（CurrentRead / CurrentWrite / CurrentReadWrite），
    /// 无法识别时回退为只读。
    pub fn parse(raw: &str) -> Self {
        match raw {
            "CurrentWrite" => Self::Write,
            "CurrentReadWrite" => Self::ReadWrite,
            _ => Self::Read,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "CurrentRead",
            Self::Write => "CurrentWrite",
            Self::ReadWrite => "CurrentReadWrite",
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// 量程换算配置。
///
/// 数值字段保持字符串形态（与持久化一致），解析失败的降级策略
/// 由 scaling 能力定义：回退为原始值并告警。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalingSpec {
    pub enabled: bool,
    /// 原始量程下限（如电压），默认 "0"。
    pub raw_min: String,
    /// 原始量程上限（如电压），默认 "3.3"。
    pub raw_max: String,
    /// 工程量下限。
    pub eng_min: String,
    /// 工程量上限。
    pub eng_max: String,
    /// 工程量单位标签（bar、°C、psi 等）。
    pub unit: Option<String>,
}

/// 节点定义（一个协议数据点的完整配置）。
#[derive(Debug, Clone)]
pub struct NodeDefinition {
    /// 逻辑名称（展示用）。
    pub name: String,
    /// 协议标识（注册表内唯一）。
    pub node_id: String,
    /// 父节点标识（文件夹层级，可空）。
    pub parent_id: Option<String>,
    pub value_type: ValueType,
    pub access: AccessMode,
    /// 数据源类别（simulation / manual / gpio / ads1115 / mcp3008）。
    pub source_kind: String,
    /// 数据源参数表（按类别解释）。
    pub source_params: serde_json::Map<String, serde_json::Value>,
    pub poll_interval_ms: u64,
    /// 初始值（字符串形态，按 value_type 强转）。
    pub initial_value: Option<String>,
    pub enabled: bool,
    pub scaling: Option<ScalingSpec>,
}

impl NodeDefinition {
    /// 构造最小可用定义（测试与演示用）。
    pub fn new(name: impl Into<String>, node_id: impl Into<String>, source_kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_id: node_id.into(),
            parent_id: None,
            value_type: ValueType::Float,
            access: AccessMode::Read,
            source_kind: source_kind.into(),
            source_params: serde_json::Map::new(),
            poll_interval_ms: 1000,
            initial_value: None,
            enabled: true,
            scaling: None,
        }
    }
}
