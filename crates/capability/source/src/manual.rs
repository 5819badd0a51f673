//! 手动数据源：内存可设值。

use crate::params::get_f64;
use crate::{DataSource, SourceError, SourceKind};
use async_trait::async_trait;
use domain::ScalarValue;
use serde_json::{Map, Value};
use std::sync::Mutex;
use tracing::info;

/// 手动数据源。
///
/// 读取返回最后一次写入的值；写入永远成功。
pub struct ManualSource {
    name: String,
    value: Mutex<ScalarValue>,
}

impl ManualSource {
    pub fn new(name: &str, params: &Map<String, Value>) -> Self {
        let initial = get_f64(params, "initial_value", 0.0);
        Self {
            name: name.to_string(),
            value: Mutex::new(ScalarValue::Float(initial)),
        }
    }
}

#[async_trait]
impl DataSource for ManualSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Manual
    }

    async fn read(&self) -> Result<Option<ScalarValue>, SourceError> {
        let value = match self.value.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Ok(Some(value))
    }

    async fn write(&self, value: &ScalarValue) -> Result<(), SourceError> {
        match self.value.lock() {
            Ok(mut guard) => *guard = value.clone(),
            Err(poisoned) => *poisoned.into_inner() = value.clone(),
        }
        info!(target: "bridge.source", "manual source {} updated to {}", self.name, value);
        Ok(())
    }

    fn last_error(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn read_returns_last_written_value() {
        let params = json!({"initial_value": 1.5}).as_object().cloned().expect("params");
        let source = ManualSource::new("m", &params);
        assert_eq!(
            source.read().await.expect("read"),
            Some(ScalarValue::Float(1.5))
        );
        source
            .write(&ScalarValue::Text("override".to_string()))
            .await
            .expect("write");
        assert_eq!(
            source.read().await.expect("read"),
            Some(ScalarValue::Text("override".to_string()))
        );
    }
}
