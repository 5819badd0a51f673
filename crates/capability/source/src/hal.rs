//! 硬件访问抽象（HAL）。
//!
//! 真实硬件（GPIO 线、I²C/SPI ADC）是外部依赖，这里只定义数据源
//! 消费的最小接口。目录实现负责把"硬件缺失"与"IO 故障"区分开：
//! 前者让数据源进入 mock 模式，后者在读写路径上报。

/// 硬件访问错误。
#[derive(Debug, thiserror::Error)]
pub enum HalError {
    /// 硬件/驱动库不可用（非致命，数据源降级为 mock 模式）。
    #[error("hardware unavailable: {0}")]
    Unavailable(String),
    /// 具体一次读写失败。
    #[error("io failure: {0}")]
    Io(String),
}

/// 数字线方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDirection {
    /// 输入线（下拉语义：悬空读 0）。
    Input,
    Output,
}

/// 一条已配置好的数字线。
pub trait DigitalLine: Send + Sync {
    fn read(&self) -> Result<bool, HalError>;
    fn write(&self, high: bool) -> Result<(), HalError>;
}

/// 一个已配置好的模拟量通道（读电压）。
pub trait AnalogChannel: Send + Sync {
    fn voltage(&self) -> Result<f64, HalError>;
}

/// 硬件目录：按地址参数装配具体通道。
pub trait HardwareCatalog: Send + Sync {
    /// 申请一条数字线。
    fn digital_line(&self, line: u8, direction: LineDirection) -> Result<Box<dyn DigitalLine>, HalError>;

    /// 申请一个 I²C ADC 通道（地址 + 增益，如 ADS1115）。
    fn i2c_adc_channel(&self, address: u16, gain: u64, channel: u8) -> Result<Box<dyn AnalogChannel>, HalError>;

    /// 申请一个 SPI ADC 通道（片选线，如 MCP3008）。
    fn spi_adc_channel(&self, cs_line: u8, channel: u8) -> Result<Box<dyn AnalogChannel>, HalError>;
}

/// 无硬件环境的目录：所有申请都报不可用。
///
/// 数据源据此进入 mock 模式并保留可见错误串。
#[derive(Debug, Default)]
pub struct UnavailableCatalog;

impl HardwareCatalog for UnavailableCatalog {
    fn digital_line(&self, line: u8, _direction: LineDirection) -> Result<Box<dyn DigitalLine>, HalError> {
        Err(HalError::Unavailable(format!(
            "GPIO line {} not available (running in mock mode)",
            line
        )))
    }

    fn i2c_adc_channel(&self, address: u16, _gain: u64, channel: u8) -> Result<Box<dyn AnalogChannel>, HalError> {
        Err(HalError::Unavailable(format!(
            "I2C ADC 0x{:02x} channel {} not available (mock mode)",
            address, channel
        )))
    }

    fn spi_adc_channel(&self, cs_line: u8, channel: u8) -> Result<Box<dyn AnalogChannel>, HalError> {
        Err(HalError::Unavailable(format!(
            "SPI ADC cs {} channel {} not available (mock mode)",
            cs_line, channel
        )))
    }
}
