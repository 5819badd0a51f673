//! 数字 IO 数据源。

use crate::hal::{DigitalLine, HalError, HardwareCatalog, LineDirection};
use crate::params::{get_str, get_u64};
use crate::{DataSource, ErrorSlot, SourceError, SourceKind};
use async_trait::async_trait;
use domain::ScalarValue;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

/// 数字线数据源。
///
/// 硬件不可用时进入 mock 模式：读返回固定 0，错误串保持可见。
/// 真实模式下输入读失败以 None 哨兵上报；输出写成功会清除错误串。
pub struct GpioSource {
    name: String,
    line_no: u8,
    direction: LineDirection,
    line: Option<Box<dyn DigitalLine>>,
    error: ErrorSlot,
}

impl GpioSource {
    pub fn new(name: &str, params: &Map<String, Value>, catalog: &dyn HardwareCatalog) -> Self {
        let line_no = get_u64(params, "pin", 0) as u8;
        let direction = match get_str(params, "mode", "input") {
            "output" => LineDirection::Output,
            _ => LineDirection::Input,
        };
        let error = ErrorSlot::default();
        let line = match catalog.digital_line(line_no, direction) {
            Ok(line) => {
                info!(target: "bridge.source", "gpio line {} configured as {:?}", line_no, direction);
                Some(line)
            }
            Err(HalError::Unavailable(message)) => {
                warn!(target: "bridge.source", "gpio source {}: {}", name, message);
                error.set(message);
                None
            }
            Err(err) => {
                error!(target: "bridge.source", "gpio line {} setup failed: {}", line_no, err);
                error.set(err.to_string());
                None
            }
        };
        Self {
            name: name.to_string(),
            line_no,
            direction,
            line,
            error,
        }
    }
}

#[async_trait]
impl DataSource for GpioSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Gpio
    }

    async fn read(&self) -> Result<Option<ScalarValue>, SourceError> {
        match &self.line {
            Some(line) => match line.read() {
                Ok(high) => Ok(Some(ScalarValue::Int(if high { 1 } else { 0 }))),
                Err(err) => {
                    // None 哨兵：下游显示为故障态
                    self.error.set(err.to_string());
                    Ok(None)
                }
            },
            // mock 模式：固定 0，错误串保持可见
            None => Ok(Some(ScalarValue::Int(0))),
        }
    }

    async fn write(&self, value: &ScalarValue) -> Result<(), SourceError> {
        if self.direction == LineDirection::Input {
            warn!(
                target: "bridge.source",
                "gpio line {} is configured as input, write discarded", self.line_no
            );
            return Ok(());
        }
        match &self.line {
            Some(line) => match line.write(value.truthy()) {
                Ok(()) => {
                    self.error.clear();
                    Ok(())
                }
                Err(err) => {
                    self.error.set(err.to_string());
                    Err(SourceError::Write(err.to_string()))
                }
            },
            None => {
                error!(
                    target: "bridge.source",
                    "cannot write to gpio line {} of {}: hardware unavailable", self.line_no, self.name
                );
                Ok(())
            }
        }
    }

    fn last_error(&self) -> Option<String> {
        self.error.get()
    }
}
