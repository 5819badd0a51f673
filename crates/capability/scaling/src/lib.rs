//! 量程换算能力：原始测量值（如电压）→ 工程量的线性变换。

use domain::ScalingSpec;
use tracing::warn;

/// 量程参数解析错误。
#[derive(Debug, thiserror::Error)]
pub enum ScalingError {
    #[error("invalid scaling parameter {0}: {1}")]
    InvalidParameter(&'static str, String),
}

/// 线性量程换算。
///
/// `raw_max == raw_min` 时为避免除零，结果定义为 `eng_min`
/// （退化量程的既定策略，不视为错误）。
pub fn scale(raw: f64, raw_min: f64, raw_max: f64, eng_min: f64, eng_max: f64) -> f64 {
    if raw_max == raw_min {
        return eng_min;
    }
    eng_min + (raw - raw_min) / (raw_max - raw_min) * (eng_max - eng_min)
}

/// 解析后的量程参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingParams {
    pub raw_min: f64,
    pub raw_max: f64,
    pub eng_min: f64,
    pub eng_max: f64,
}

impl ScalingParams {
    /// 从持久化字符串字段解析量程参数。
    pub fn parse(spec: &ScalingSpec) -> Result<Self, ScalingError> {
        Ok(Self {
            raw_min: parse_field("raw_min", &spec.raw_min)?,
            raw_max: parse_field("raw_max", &spec.raw_max)?,
            eng_min: parse_field("eng_min", &spec.eng_min)?,
            eng_max: parse_field("eng_max", &spec.eng_max)?,
        })
    }
}

fn parse_field(name: &'static str, raw: &str) -> Result<f64, ScalingError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ScalingError::InvalidParameter(name, raw.to_string()))
}

/// 按节点的量程配置换算原始值。
///
/// 未启用时原样返回；参数解析失败时回退为原始值并告警，
/// 永远不向调用方抛错。
pub fn apply_spec(node_id: &str, spec: &ScalingSpec, raw: f64) -> f64 {
    if !spec.enabled {
        return raw;
    }
    match ScalingParams::parse(spec) {
        Ok(params) => scale(raw, params.raw_min, params.raw_max, params.eng_min, params.eng_max),
        Err(err) => {
            warn!(target: "bridge.scaling", "node {}: {}, falling back to raw value", node_id, err);
            bridge_telemetry::record_scaling_fallback();
            raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(raw_min: &str, raw_max: &str, eng_min: &str, eng_max: &str) -> ScalingSpec {
        ScalingSpec {
            enabled: true,
            raw_min: raw_min.to_string(),
            raw_max: raw_max.to_string(),
            eng_min: eng_min.to_string(),
            eng_max: eng_max.to_string(),
            unit: Some("bar".to_string()),
        }
    }

    #[test]
    fn endpoints_map_exactly() {
        assert_eq!(scale(0.0, 0.0, 3.3, 0.0, 100.0), 0.0);
        assert_eq!(scale(3.3, 0.0, 3.3, 0.0, 100.0), 100.0);
    }

    #[test]
    fn midpoint_is_linear() {
        let mid = scale(1.65, 0.0, 3.3, 0.0, 100.0);
        assert!((mid - 50.0).abs() < 1e-9);
    }

    #[test]
    fn monotonic_with_inverted_engineering_range() {
        let low = scale(0.5, 0.0, 3.3, 100.0, 0.0);
        let high = scale(2.5, 0.0, 3.3, 100.0, 0.0);
        assert!(low > high);
    }

    #[test]
    fn degenerate_raw_range_yields_eng_min() {
        assert_eq!(scale(7.2, 5.0, 5.0, 0.0, 100.0), 0.0);
        assert_eq!(scale(-3.0, 5.0, 5.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn apply_spec_disabled_passes_raw() {
        let mut s = spec("0", "3.3", "0", "100");
        s.enabled = false;
        assert_eq!(apply_spec("n1", &s, 1.65), 1.65);
    }

    #[test]
    fn apply_spec_parse_failure_falls_back_to_raw() {
        let s = spec("0", "not-a-number", "0", "100");
        assert_eq!(apply_spec("n1", &s, 2.2), 2.2);
    }

    #[test]
    fn apply_spec_scales_when_enabled() {
        let s = spec("0", "10", "0", "50");
        assert_eq!(apply_spec("n1", &s, 4.0), 20.0);
    }
}
