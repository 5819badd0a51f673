//! 节点 CRUD handlers
//!
//! - GET /nodes - 列出全部节点定义（含禁用项）
//! - POST /nodes - 创建节点（运行中立即挂到地址空间）
//! - GET /nodes/{node_id} - 获取节点定义
//! - PUT /nodes/{node_id} - 整体替换节点定义（运行中重建）
//! - DELETE /nodes/{node_id} - 删除节点
//! - GET /nodes/live/values - 当前实时值列表
//! - POST /nodes/{node_id}/value - 手动写值（转发给数据源）

use crate::AppState;
use crate::utils::response::{bad_request_error, lifecycle_error, not_found_error, storage_error};
use crate::utils::{
    definition_from_create, definition_from_update, live_value_to_dto, node_to_dto, scalar_from_json,
};
use api_contract::{ApiResponse, CreateNodeRequest, LiveValueDto, NodeDto, UpdateNodeRequest, WriteValueRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_source::SourceKind;
use bridge_storage::NodeDefinitionStore;

/// 列出节点定义
pub async fn list_nodes(State(state): State<AppState>) -> Response {
    match state.definitions.list_all().await {
        Ok(items) => {
            let data: Vec<NodeDto> = items.into_iter().map(node_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 创建节点
pub async fn create_node(
    State(state): State<AppState>,
    Json(req): Json<CreateNodeRequest>,
) -> Response {
    if req.name.trim().is_empty() {
        return bad_request_error("name must not be empty");
    }
    if req.node_id.trim().is_empty() {
        return bad_request_error("nodeId must not be empty");
    }
    if SourceKind::parse(&req.source_kind).is_none() {
        return bad_request_error(format!("unknown source kind: {}", req.source_kind));
    }
    let definition = definition_from_create(req);
    match state.lifecycle.add_node(definition.clone()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(node_to_dto(definition))),
        )
            .into_response(),
        Err(err) => lifecycle_error(err),
    }
}

/// 获取节点定义
pub async fn get_node(State(state): State<AppState>, Path(node_id): Path<String>) -> Response {
    match state.definitions.find(&node_id).await {
        Ok(Some(definition)) => (
            StatusCode::OK,
            Json(ApiResponse::success(node_to_dto(definition))),
        )
            .into_response(),
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 更新节点定义（整体替换）
pub async fn update_node(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
    Json(req): Json<UpdateNodeRequest>,
) -> Response {
    if SourceKind::parse(&req.source_kind).is_none() {
        return bad_request_error(format!("unknown source kind: {}", req.source_kind));
    }
    let definition = definition_from_update(node_id, req);
    match state.lifecycle.update_node(definition.clone()).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(node_to_dto(definition))),
        )
            .into_response(),
        Ok(false) => not_found_error(),
        Err(err) => lifecycle_error(err),
    }
}

/// 删除节点
pub async fn delete_node(State(state): State<AppState>, Path(node_id): Path<String>) -> Response {
    match state.lifecycle.remove_node(&node_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "removed": node_id }))),
        )
            .into_response(),
        Ok(false) => not_found_error(),
        Err(err) => lifecycle_error(err),
    }
}

/// 实时值列表（服务器停止时为空表）
pub async fn live_values(State(state): State<AppState>) -> Response {
    let data: Vec<LiveValueDto> = state
        .lifecycle
        .live_values()
        .await
        .into_iter()
        .map(live_value_to_dto)
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 手动写值：按数据源语义转发
pub async fn write_node_value(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
    Json(req): Json<WriteValueRequest>,
) -> Response {
    let Some(value) = scalar_from_json(&req.value) else {
        return bad_request_error("value must be a scalar");
    };
    match state.lifecycle.write_node(&node_id, &value).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "written": node_id }))),
        )
            .into_response(),
        Err(err) => lifecycle_error(err),
    }
}
