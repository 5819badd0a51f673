//! 服务器生命周期 handlers
//!
//! - GET /health - 进程健康检查
//! - POST /server/start|stop|restart - 生命周期控制
//! - GET /server/status - 当前状态视图

use crate::AppState;
use crate::utils::response::lifecycle_error;
use api_contract::{ApiResponse, ServerStatusDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

pub async fn start_server(State(state): State<AppState>) -> Response {
    match state.lifecycle.start().await {
        Ok(()) => status_response(&state).await,
        Err(err) => lifecycle_error(err),
    }
}

pub async fn stop_server(State(state): State<AppState>) -> Response {
    match state.lifecycle.stop().await {
        Ok(()) => status_response(&state).await,
        Err(err) => lifecycle_error(err),
    }
}

pub async fn restart_server(State(state): State<AppState>) -> Response {
    match state.lifecycle.restart().await {
        Ok(()) => status_response(&state).await,
        Err(err) => lifecycle_error(err),
    }
}

pub async fn server_status(State(state): State<AppState>) -> Response {
    status_response(&state).await
}

async fn status_response(state: &AppState) -> Response {
    let status = state.lifecycle.status().await;
    let dto = ServerStatusDto {
        state: status.state.to_string(),
        endpoint: status.endpoint,
        active_sessions: status.active_sessions,
        node_count: status.node_count,
    };
    (StatusCode::OK, Json(ApiResponse::success(dto))).into_response()
}
