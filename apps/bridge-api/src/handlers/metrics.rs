//! 指标 handler
//!
//! GET /metrics - 进程启动以来的累计计数快照。

use api_contract::{ApiResponse, MetricsDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn get_metrics() -> Response {
    let snapshot = bridge_telemetry::metrics().snapshot();
    let dto = MetricsDto {
        poll_ticks: snapshot.poll_ticks,
        values_published: snapshot.values_published,
        read_failures: snapshot.read_failures,
        write_forwards: snapshot.write_forwards,
        write_failures: snapshot.write_failures,
        coercion_fallbacks: snapshot.coercion_fallbacks,
        scaling_fallbacks: snapshot.scaling_fallbacks,
        auth_success: snapshot.auth_success,
        auth_failure: snapshot.auth_failure,
        server_starts: snapshot.server_starts,
        server_stops: snapshot.server_stops,
    };
    (StatusCode::OK, Json(ApiResponse::success(dto))).into_response()
}
