//! DTO 与领域模型互转。

use api_contract::{CreateNodeRequest, LiveValueDto, NodeDto, ScalingDto, UpdateNodeRequest};
use bridge_registry::LiveValue;
use domain::{AccessMode, NodeDefinition, ScalarValue, ScalingSpec, ValueType};

pub fn node_to_dto(definition: NodeDefinition) -> NodeDto {
    NodeDto {
        name: definition.name,
        node_id: definition.node_id,
        parent_id: definition.parent_id,
        value_type: definition.value_type.as_str().to_string(),
        access: definition.access.as_str().to_string(),
        source_kind: definition.source_kind,
        source_params: definition.source_params,
        poll_interval_ms: definition.poll_interval_ms,
        initial_value: definition.initial_value,
        enabled: definition.enabled,
        scaling: definition.scaling.map(scaling_to_dto),
    }
}

pub fn scaling_to_dto(spec: ScalingSpec) -> ScalingDto {
    ScalingDto {
        enabled: spec.enabled,
        raw_min: Some(spec.raw_min),
        raw_max: Some(spec.raw_max),
        eng_min: spec.eng_min,
        eng_max: spec.eng_max,
        unit: spec.unit,
    }
}

/// 原始量程省略时取默认电压范围。
pub fn scaling_from_dto(dto: ScalingDto) -> ScalingSpec {
    ScalingSpec {
        enabled: dto.enabled,
        raw_min: dto.raw_min.unwrap_or_else(|| "0".to_string()),
        raw_max: dto.raw_max.unwrap_or_else(|| "3.3".to_string()),
        eng_min: dto.eng_min,
        eng_max: dto.eng_max,
        unit: dto.unit,
    }
}

pub fn definition_from_create(request: CreateNodeRequest) -> NodeDefinition {
    NodeDefinition {
        name: request.name,
        node_id: request.node_id,
        parent_id: request.parent_id,
        value_type: request
            .value_type
            .map(|raw| ValueType::parse(&raw))
            .unwrap_or(ValueType::Float),
        access: request
            .access
            .map(|raw| AccessMode::parse(&raw))
            .unwrap_or(AccessMode::Read),
        source_kind: request.source_kind,
        source_params: request.source_params,
        poll_interval_ms: request.poll_interval_ms.unwrap_or(1000),
        initial_value: request.initial_value,
        enabled: request.enabled.unwrap_or(true),
        scaling: request.scaling.map(scaling_from_dto),
    }
}

pub fn definition_from_update(node_id: String, request: UpdateNodeRequest) -> NodeDefinition {
    NodeDefinition {
        name: request.name,
        node_id,
        parent_id: request.parent_id,
        value_type: request
            .value_type
            .map(|raw| ValueType::parse(&raw))
            .unwrap_or(ValueType::Float),
        access: request
            .access
            .map(|raw| AccessMode::parse(&raw))
            .unwrap_or(AccessMode::Read),
        source_kind: request.source_kind,
        source_params: request.source_params,
        poll_interval_ms: request.poll_interval_ms.unwrap_or(1000),
        initial_value: request.initial_value,
        enabled: request.enabled.unwrap_or(true),
        scaling: request.scaling.map(scaling_from_dto),
    }
}

pub fn live_value_to_dto(value: LiveValue) -> LiveValueDto {
    LiveValueDto {
        node_id: value.node_id,
        name: value.name,
        value: scalar_to_json(value.value),
        raw_value: scalar_to_json(value.raw_value),
        error: value.error,
        source_kind: value.source_kind,
        value_type: value.value_type.to_string(),
        scale_unit: value.scale_unit,
    }
}

pub fn scalar_to_json(value: Option<ScalarValue>) -> serde_json::Value {
    match value {
        Some(value) => value.into(),
        None => serde_json::Value::Null,
    }
}

/// JSON 请求体 → 标量；对象与数组没有标量语义，返回 None。
pub fn scalar_from_json(value: &serde_json::Value) -> Option<ScalarValue> {
    match value {
        serde_json::Value::Bool(v) => Some(ScalarValue::Bool(*v)),
        serde_json::Value::Number(number) => {
            if let Some(v) = number.as_i64() {
                Some(ScalarValue::Int(v))
            } else {
                number.as_f64().map(ScalarValue::Float)
            }
        }
        serde_json::Value::String(v) => Some(ScalarValue::Text(v.clone())),
        _ => None,
    }
}
