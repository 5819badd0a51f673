//! HTTP 错误响应辅助函数
//!
//! 所有错误返回统一的 ApiResponse 格式，HTTP 状态码与错误码对应：
//! - 401 AUTH.UNAUTHORIZED：凭据校验失败
//! - 400 INVALID.REQUEST：请求体不合法
//! - 404 RESOURCE.NOT_FOUND：节点不存在
//! - 409 SERVER.INVALID_STATE / NODE.DUPLICATE：状态或唯一性冲突
//! - 500 INTERNAL.ERROR / STORAGE.ERROR：内部错误

use api_contract::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_registry::RegistryError;
use bridge_server::LifecycleError;
use bridge_source::SourceError;
use bridge_storage::StorageError;

/// 认证错误响应
pub fn auth_error() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("STORAGE.ERROR", err.to_string())),
    )
        .into_response()
}

/// 生命周期/注册表错误按语义映射状态码。
pub fn lifecycle_error(err: LifecycleError) -> Response {
    match err {
        LifecycleError::InvalidState { .. } => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error("SERVER.INVALID_STATE", err.to_string())),
        )
            .into_response(),
        LifecycleError::Registry(RegistryError::UnknownNode(_)) => not_found_error(),
        LifecycleError::Registry(RegistryError::Duplicate(node_id)) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(
                "NODE.DUPLICATE",
                format!("node already registered: {}", node_id),
            )),
        )
            .into_response(),
        LifecycleError::Registry(RegistryError::Source(SourceError::UnknownKind(kind))) => {
            bad_request_error(format!("unknown source kind: {}", kind))
        }
        LifecycleError::Registry(RegistryError::Source(SourceError::WriteUnsupported)) => {
            bad_request_error("source is read-only")
        }
        LifecycleError::Storage(err) => storage_error(err),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("INTERNAL.ERROR", other.to_string())),
        )
            .into_response(),
    }
}
