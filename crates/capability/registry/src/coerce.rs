//! 值类型强转。
//!
//! 强转失败回退既定默认值（数值 0、布尔 false），只告警不抛错，
//! 绝不打断调用方的批量操作。

use domain::{ScalarValue, ValueType};
use tracing::warn;

/// 初始值强转：布尔按忽略大小写的 "true" 判定；数值尽力解析，
/// 失败取 0；其余类型原样透传为文本。
pub fn coerce_initial(raw: Option<&str>, value_type: ValueType) -> ScalarValue {
    match value_type {
        ValueType::Boolean => {
            ScalarValue::Bool(raw.map(|s| s.trim().eq_ignore_ascii_case("true")).unwrap_or(false))
        }
        ValueType::Float | ValueType::Double => {
            ScalarValue::Float(raw.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(0.0))
        }
        ValueType::Int16 | ValueType::Int32 => {
            ScalarValue::Int(raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0))
        }
        ValueType::String | ValueType::DateTime => {
            ScalarValue::Text(raw.unwrap_or_default().to_string())
        }
    }
}

/// 写出前按节点声明类型强转。
pub fn coerce_value(node_id: &str, value: &ScalarValue, value_type: ValueType) -> ScalarValue {
    match value_type {
        ValueType::Boolean => ScalarValue::Bool(value.truthy()),
        ValueType::Float | ValueType::Double => match value.as_f64() {
            Some(v) => ScalarValue::Float(v),
            None => {
                warn!(
                    target: "bridge.registry",
                    "node {}: cannot coerce {} to float, defaulting to 0", node_id, value
                );
                bridge_telemetry::record_coercion_fallback();
                ScalarValue::Float(0.0)
            }
        },
        ValueType::Int16 | ValueType::Int32 => match value.as_i64() {
            Some(v) => ScalarValue::Int(v),
            None => {
                warn!(
                    target: "bridge.registry",
                    "node {}: cannot coerce {} to integer, defaulting to 0", node_id, value
                );
                bridge_telemetry::record_coercion_fallback();
                ScalarValue::Int(0)
            }
        },
        ValueType::String => ScalarValue::Text(value.to_string()),
        // 未识别/透传类别：保持原值
        ValueType::DateTime => value.clone(),
    }
}
