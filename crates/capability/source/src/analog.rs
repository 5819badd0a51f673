//! 模拟量通道数据源（I²C / SPI 两个设备族）。

use crate::hal::{AnalogChannel, HardwareCatalog};
use crate::params::get_u64;
use crate::{DataSource, ErrorSlot, SourceError, SourceKind};
use async_trait::async_trait;
use domain::ScalarValue;
use rand::Rng;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

/// mock 模式模拟电压上限（板级参考电压）。
const MOCK_VOLTAGE_MAX: f64 = 3.3;

/// 模拟量数据源。
///
/// 初始化失败（驱动缺失或设备无响应）记录持久错误并进入 mock 模式，
/// 每次读取返回 [0, 3.3] 均匀分布电压。设备类只读，写入一律拒绝。
pub struct AnalogSource {
    kind: SourceKind,
    channel: u8,
    chan: Option<Box<dyn AnalogChannel>>,
    error: ErrorSlot,
}

impl AnalogSource {
    /// I²C 设备族（地址 + 增益，如 ADS1115）。
    pub fn new_i2c(name: &str, params: &Map<String, Value>, catalog: &dyn HardwareCatalog) -> Self {
        let channel = get_u64(params, "channel", 0) as u8;
        let address = get_u64(params, "i2c_address", 0x48) as u16;
        let gain = get_u64(params, "gain", 1);
        let error = ErrorSlot::default();
        let chan = match catalog.i2c_adc_channel(address, gain, channel) {
            Ok(chan) => {
                info!(target: "bridge.source", "initialized i2c adc channel {} at 0x{:02x}", channel, address);
                Some(chan)
            }
            Err(err) => {
                warn!(target: "bridge.source", "i2c adc source {}: {}", name, err);
                error.set(err.to_string());
                None
            }
        };
        Self {
            kind: SourceKind::Ads1115,
            channel,
            chan,
            error,
        }
    }

    /// SPI 设备族（片选线，如 MCP3008）。
    pub fn new_spi(name: &str, params: &Map<String, Value>, catalog: &dyn HardwareCatalog) -> Self {
        let channel = get_u64(params, "channel", 0) as u8;
        let cs_line = get_u64(params, "cs_pin", 8) as u8;
        let error = ErrorSlot::default();
        let chan = match catalog.spi_adc_channel(cs_line, channel) {
            Ok(chan) => {
                info!(target: "bridge.source", "initialized spi adc channel {} with cs line {}", channel, cs_line);
                Some(chan)
            }
            Err(err) => {
                warn!(target: "bridge.source", "spi adc source {}: {}", name, err);
                error.set(err.to_string());
                None
            }
        };
        Self {
            kind: SourceKind::Mcp3008,
            channel,
            chan,
            error,
        }
    }
}

#[async_trait]
impl DataSource for AnalogSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn read(&self) -> Result<Option<ScalarValue>, SourceError> {
        match &self.chan {
            Some(chan) => match chan.voltage() {
                Ok(voltage) => Ok(Some(ScalarValue::Float(voltage))),
                Err(err) => {
                    error!(target: "bridge.source", "adc channel {} read failed: {}", self.channel, err);
                    self.error.set(err.to_string());
                    Ok(Some(ScalarValue::Float(0.0)))
                }
            },
            // mock 模式：[0, 3.3] 均匀分布电压
            None => {
                let voltage = rand::thread_rng().r#gen::<f64>() * MOCK_VOLTAGE_MAX;
                Ok(Some(ScalarValue::Float(voltage)))
            }
        }
    }

    async fn write(&self, _value: &ScalarValue) -> Result<(), SourceError> {
        warn!(target: "bridge.source", "cannot write to adc channel {} (read only)", self.channel);
        Err(SourceError::WriteUnsupported)
    }

    fn last_error(&self) -> Option<String> {
        self.error.get()
    }
}
