//! 数据源能力：为每个节点生产/接收标量值。
//!
//! 变体为封闭集合，由 [`SourceFactory`] 按 `source_kind` 分发构造：
//! - simulation：固定模式模拟（random / sine / incremental）
//! - manual：内存可设值
//! - gpio：数字输入/输出线
//! - ads1115 / mcp3008：模拟量通道（I²C / SPI 两个设备族）
//!
//! 硬件依赖通过 [`hal`] 抽象注入；硬件不可用时数据源进入 mock 模式，
//! 记录可见的非致命错误串而不是失败。

pub mod analog;
pub mod factory;
pub mod gpio;
pub mod hal;
pub mod manual;
pub mod params;
pub mod simulation;

use async_trait::async_trait;
use domain::ScalarValue;

pub use analog::AnalogSource;
pub use factory::SourceFactory;
pub use gpio::GpioSource;
pub use hal::{AnalogChannel, DigitalLine, HalError, HardwareCatalog, LineDirection, UnavailableCatalog};
pub use manual::ManualSource;
pub use simulation::SimulationSource;

/// 数据源错误。
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 未知数据源类别：硬构造失败，节点不得注册。
    #[error("unknown source kind: {0}")]
    UnknownKind(String),
    /// 只读设备类拒绝写入。
    #[error("source is read-only")]
    WriteUnsupported,
    #[error("read failed: {0}")]
    Read(String),
    #[error("write failed: {0}")]
    Write(String),
}

/// 数据源类别（封闭集合）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Simulation,
    Manual,
    Gpio,
    Ads1115,
    Mcp3008,
}

impl SourceKind {
    /// 解析类别字符串；未知类别返回 None（工厂据此硬失败）。
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "simulation" => Some(Self::Simulation),
            "manual" => Some(Self::Manual),
            "gpio" => Some(Self::Gpio),
            "ads1115" => Some(Self::Ads1115),
            "mcp3008" => Some(Self::Mcp3008),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulation => "simulation",
            Self::Manual => "manual",
            Self::Gpio => "gpio",
            Self::Ads1115 => "ads1115",
            Self::Mcp3008 => "mcp3008",
        }
    }
}

/// 数据源能力契约。
///
/// `read` 返回 `Ok(None)` 表示"未知/故障"哨兵（下游据此标红），
/// 永远不要用它表达可恢复 IO 错误以外的情况。
#[async_trait]
pub trait DataSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn read(&self) -> Result<Option<ScalarValue>, SourceError>;

    async fn write(&self, value: &ScalarValue) -> Result<(), SourceError>;

    /// 当前可见的非致命错误串（mock 模式、硬件故障）。
    fn last_error(&self) -> Option<String>;
}

/// 数据源内部共用的错误槽。
#[derive(Default)]
pub(crate) struct ErrorSlot {
    inner: std::sync::Mutex<Option<String>>,
}

impl ErrorSlot {
    pub fn set(&self, message: impl Into<String>) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = Some(message.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = None;
        }
    }

    pub fn get(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|slot| slot.clone())
    }
}
