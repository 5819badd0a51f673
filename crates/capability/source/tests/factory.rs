use bridge_source::hal::{
    AnalogChannel, DigitalLine, HalError, HardwareCatalog, LineDirection, UnavailableCatalog,
};
use bridge_source::{DataSource, SourceError, SourceFactory, SourceKind};
use domain::{NodeDefinition, ScalarValue};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn definition(kind: &str, params: serde_json::Value) -> NodeDefinition {
    let mut def = NodeDefinition::new("test-node", "ns=2;s=Test", kind);
    def.source_params = params.as_object().cloned().unwrap_or_default();
    def
}

fn factory() -> SourceFactory {
    SourceFactory::new(Arc::new(UnavailableCatalog))
}

#[test]
fn unknown_kind_is_hard_failure() {
    let err = factory()
        .create(&definition("modbus", json!({})))
        .err()
        .expect("must fail");
    match err {
        SourceError::UnknownKind(kind) => assert_eq!(kind, "modbus"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn gpio_without_hardware_enters_mock_mode() {
    let source = factory()
        .create(&definition("gpio", json!({"pin": 17, "mode": "input"})))
        .expect("create");
    assert_eq!(source.kind(), SourceKind::Gpio);
    // mock 模式读固定 0，错误串可见但不致命
    assert_eq!(source.read().await.expect("read"), Some(ScalarValue::Int(0)));
    let error = source.last_error().expect("error recorded");
    assert!(error.contains("mock mode"), "got: {}", error);
}

#[tokio::test]
async fn gpio_input_write_is_discarded() {
    let source = factory()
        .create(&definition("gpio", json!({"pin": 4, "mode": "input"})))
        .expect("create");
    source
        .write(&ScalarValue::Bool(true))
        .await
        .expect("discarded, not an error");
}

#[tokio::test]
async fn analog_without_hardware_returns_mock_voltage() {
    for kind in ["ads1115", "mcp3008"] {
        let source = factory()
            .create(&definition(kind, json!({"channel": 1})))
            .expect("create");
        for _ in 0..20 {
            let value = source.read().await.expect("read").expect("value");
            let voltage = value.as_f64().expect("f64");
            assert!((0.0..=3.3).contains(&voltage), "voltage out of range: {}", voltage);
        }
        assert!(source.last_error().is_some());
    }
}

#[tokio::test]
async fn analog_write_is_rejected() {
    let source = factory()
        .create(&definition("ads1115", json!({})))
        .expect("create");
    let err = source
        .write(&ScalarValue::Float(1.0))
        .await
        .expect_err("read-only device class");
    assert!(matches!(err, SourceError::WriteUnsupported));
}

// 真实硬件路径的测试替身。
struct ScriptedLine {
    fail_reads: AtomicBool,
    level: AtomicBool,
}

impl DigitalLine for ScriptedLine {
    fn read(&self) -> Result<bool, HalError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(HalError::Io("bus stuck".to_string()));
        }
        Ok(self.level.load(Ordering::SeqCst))
    }

    fn write(&self, high: bool) -> Result<(), HalError> {
        self.level.store(high, Ordering::SeqCst);
        Ok(())
    }
}

struct ScriptedCatalog {
    line: Arc<ScriptedLine>,
}

impl HardwareCatalog for ScriptedCatalog {
    fn digital_line(&self, _line: u8, _direction: LineDirection) -> Result<Box<dyn DigitalLine>, HalError> {
        let line = self.line.clone();
        Ok(Box::new(ForwardingLine { line }))
    }

    fn i2c_adc_channel(&self, _address: u16, _gain: u64, _channel: u8) -> Result<Box<dyn AnalogChannel>, HalError> {
        Err(HalError::Unavailable("no adc in this rig".to_string()))
    }

    fn spi_adc_channel(&self, _cs_line: u8, _channel: u8) -> Result<Box<dyn AnalogChannel>, HalError> {
        Err(HalError::Unavailable("no adc in this rig".to_string()))
    }
}

struct ForwardingLine {
    line: Arc<ScriptedLine>,
}

impl DigitalLine for ForwardingLine {
    fn read(&self) -> Result<bool, HalError> {
        self.line.read()
    }

    fn write(&self, high: bool) -> Result<(), HalError> {
        self.line.write(high)
    }
}

#[tokio::test]
async fn gpio_real_read_failure_yields_none_sentinel() {
    let line = Arc::new(ScriptedLine {
        fail_reads: AtomicBool::new(false),
        level: AtomicBool::new(true),
    });
    let factory = SourceFactory::new(Arc::new(ScriptedCatalog { line: line.clone() }));
    let source = factory
        .create(&definition("gpio", json!({"pin": 22, "mode": "input"})))
        .expect("create");

    assert_eq!(source.read().await.expect("read"), Some(ScalarValue::Int(1)));
    assert!(source.last_error().is_none());

    line.fail_reads.store(true, Ordering::SeqCst);
    assert_eq!(source.read().await.expect("read"), None);
    assert!(source.last_error().expect("error").contains("bus stuck"));
}

#[tokio::test]
async fn gpio_output_write_clears_error_on_success() {
    let line = Arc::new(ScriptedLine {
        fail_reads: AtomicBool::new(false),
        level: AtomicBool::new(false),
    });
    let factory = SourceFactory::new(Arc::new(ScriptedCatalog { line: line.clone() }));
    let source = factory
        .create(&definition("gpio", json!({"pin": 23, "mode": "output"})))
        .expect("create");

    // 写入按真值语义折算为 0/1
    source.write(&ScalarValue::Float(2.0)).await.expect("write");
    assert!(line.level.load(Ordering::SeqCst));
    source.write(&ScalarValue::Int(0)).await.expect("write");
    assert!(!line.level.load(Ordering::SeqCst));
    assert!(source.last_error().is_none());
}
