//! 追踪与基础指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub poll_ticks: u64,
    pub values_published: u64,
    pub read_failures: u64,
    pub write_forwards: u64,
    pub write_failures: u64,
    pub coercion_fallbacks: u64,
    pub scaling_fallbacks: u64,
    pub auth_success: u64,
    pub auth_failure: u64,
    pub server_starts: u64,
    pub server_stops: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    poll_ticks: AtomicU64,
    values_published: AtomicU64,
    read_failures: AtomicU64,
    write_forwards: AtomicU64,
    write_failures: AtomicU64,
    coercion_fallbacks: AtomicU64,
    scaling_fallbacks: AtomicU64,
    auth_success: AtomicU64,
    auth_failure: AtomicU64,
    server_starts: AtomicU64,
    server_stops: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            poll_ticks: AtomicU64::new(0),
            values_published: AtomicU64::new(0),
            read_failures: AtomicU64::new(0),
            write_forwards: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            coercion_fallbacks: AtomicU64::new(0),
            scaling_fallbacks: AtomicU64::new(0),
            auth_success: AtomicU64::new(0),
            auth_failure: AtomicU64::new(0),
            server_starts: AtomicU64::new(0),
            server_stops: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            poll_ticks: self.poll_ticks.load(Ordering::Relaxed),
            values_published: self.values_published.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            write_forwards: self.write_forwards.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            coercion_fallbacks: self.coercion_fallbacks.load(Ordering::Relaxed),
            scaling_fallbacks: self.scaling_fallbacks.load(Ordering::Relaxed),
            auth_success: self.auth_success.load(Ordering::Relaxed),
            auth_failure: self.auth_failure.load(Ordering::Relaxed),
            server_starts: self.server_starts.load(Ordering::Relaxed),
            server_stops: self.server_stops.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录轮询节拍次数。
pub fn record_poll_tick() {
    metrics().poll_ticks.fetch_add(1, Ordering::Relaxed);
}

/// 记录发布到地址空间的采样次数。
pub fn record_value_published() {
    metrics().values_published.fetch_add(1, Ordering::Relaxed);
}

/// 记录数据源读失败次数。
pub fn record_read_failure() {
    metrics().read_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录客户端写入转发次数。
pub fn record_write_forward() {
    metrics().write_forwards.fetch_add(1, Ordering::Relaxed);
}

/// 记录写入转发失败次数。
pub fn record_write_failure() {
    metrics().write_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录类型强转回退默认值次数。
pub fn record_coercion_fallback() {
    metrics().coercion_fallbacks.fetch_add(1, Ordering::Relaxed);
}

/// 记录量程参数解析失败回退原始值次数。
pub fn record_scaling_fallback() {
    metrics().scaling_fallbacks.fetch_add(1, Ordering::Relaxed);
}

/// 记录会话鉴权通过次数。
pub fn record_auth_success() {
    metrics().auth_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录会话鉴权拒绝次数。
pub fn record_auth_failure() {
    metrics().auth_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录服务器启动完成次数。
pub fn record_server_start() {
    metrics().server_starts.fetch_add(1, Ordering::Relaxed);
}

/// 记录服务器停止完成次数。
pub fn record_server_stop() {
    metrics().server_stops.fetch_add(1, Ordering::Relaxed);
}
