//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 凭据诊断：/auth/check
//! - 节点管理：/nodes/*
//! - 服务器控制：/server/*
//! - 指标：/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/check", post(auth_check))
        .route("/nodes", get(list_nodes).post(create_node))
        .route("/nodes/live/values", get(live_values))
        .route(
            "/nodes/:node_id",
            get(get_node).put(update_node).delete(delete_node),
        )
        .route("/nodes/:node_id/value", post(write_node_value))
        .route("/server/start", post(start_server))
        .route("/server/stop", post(stop_server))
        .route("/server/restart", post(restart_server))
        .route("/server/status", get(server_status))
        .route("/server/settings", get(get_settings).put(put_settings))
        .route("/metrics", get(get_metrics))
}
