//! source_params 参数表读取辅助。

use serde_json::{Map, Value};

pub fn get_f64(params: &Map<String, Value>, key: &str, default: f64) -> f64 {
    params
        .get(key)
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .unwrap_or(default)
}

pub fn get_u64(params: &Map<String, Value>, key: &str, default: u64) -> u64 {
    params
        .get(key)
        .and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        })
        .unwrap_or(default)
}

pub fn get_str<'a>(params: &'a Map<String, Value>, key: &str, default: &'a str) -> &'a str {
    params
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
}
