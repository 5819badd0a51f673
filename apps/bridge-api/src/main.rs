//! 管理面 HTTP 服务入口。
//!
//! 组装整个桥接子系统并暴露管理 API：
//! - 内存存储（节点定义 / 设置 / 用户）+ 内置 admin 账户
//! - 无硬件环境的数据源工厂（mock 模式）
//! - 内存协议服务器工厂 + 会话鉴权桥
//! - 服务器生命周期控制器（可配置进程启动时自动拉起）

mod handlers;
mod routes;
mod utils;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use bridge_auth::AuthorizationBridge;
use bridge_config::AppConfig;
use bridge_protocol::{InMemoryProtocolFactory, SessionAuthorizer};
use bridge_server::{FileIdentity, IdentityProvider, NoIdentity, ServerLifecycle};
use bridge_source::{SourceFactory, UnavailableCatalog};
use bridge_storage::{
    InMemoryNodeDefinitionStore, InMemorySettingStore, InMemoryUserStore, NodeDefinitionStore,
    SettingStore,
};
use bridge_telemetry::{init_tracing, new_request_ids};
use domain::{NodeDefinition, ScalingSpec, ValueType};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, warn};

#[derive(Clone)]
struct AppState {
    lifecycle: Arc<ServerLifecycle>,
    definitions: Arc<dyn NodeDefinitionStore>,
    settings: Arc<dyn SettingStore>,
    authorizer: Arc<dyn SessionAuthorizer>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let definitions: Arc<dyn NodeDefinitionStore> = if config.seed_demo_nodes {
        Arc::new(InMemoryNodeDefinitionStore::with_definitions(demo_nodes()))
    } else {
        Arc::new(InMemoryNodeDefinitionStore::new())
    };
    let settings: Arc<dyn SettingStore> = Arc::new(InMemorySettingStore::new());
    let users = Arc::new(InMemoryUserStore::with_default_admin());
    let authorizer: Arc<dyn SessionAuthorizer> =
        Arc::new(AuthorizationBridge::new(users, settings.clone()));

    let identity: Arc<dyn IdentityProvider> =
        match (&config.certificate_path, &config.private_key_path) {
            (Some(certificate), Some(private_key)) => {
                Arc::new(FileIdentity::new(certificate, private_key))
            }
            _ => Arc::new(NoIdentity),
        };

    let lifecycle = Arc::new(ServerLifecycle::new(
        Arc::new(InMemoryProtocolFactory),
        Arc::new(SourceFactory::new(Arc::new(UnavailableCatalog))),
        definitions.clone(),
        settings.clone(),
        authorizer.clone(),
        identity,
    ));

    if config.auto_start {
        // 启动失败不拖垮管理面：可通过 /server/start 重试
        if let Err(err) = lifecycle.start().await {
            warn!(target: "bridge.api", "auto start failed: {}", err);
        }
    }

    let state = AppState {
        lifecycle,
        definitions,
        settings,
        authorizer,
    };

    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// 空存储时的本地演示节点。
fn demo_nodes() -> Vec<NodeDefinition> {
    let mut sine = NodeDefinition::new("Demo Sine", "ns=2;s=Demo.Sine", "simulation");
    sine.source_params.insert(
        "sim_type".to_string(),
        serde_json::Value::String("sine".to_string()),
    );

    let mut button = NodeDefinition::new("Demo Button", "ns=2;s=Demo.Button", "gpio");
    button.value_type = ValueType::Int32;
    button
        .source_params
        .insert("pin".to_string(), serde_json::Value::from(17));

    let mut pressure = NodeDefinition::new("Demo Pressure", "ns=2;s=Demo.Pressure", "ads1115");
    pressure
        .source_params
        .insert("channel".to_string(), serde_json::Value::from(0));
    pressure.scaling = Some(ScalingSpec {
        enabled: true,
        raw_min: "0".to_string(),
        raw_max: "3.3".to_string(),
        eng_min: "0".to_string(),
        eng_max: "16".to_string(),
        unit: Some("bar".to_string()),
    });

    vec![sine, button, pressure]
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}
