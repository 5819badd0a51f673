//! 服务器设置 handlers
//!
//! 设置即时持久化、延迟生效：端点参数在下一次 start/restart 时
//! 才会被 setup 读取。
//! - GET /server/settings - 读取全部设置（缺省键补默认值）
//! - PUT /server/settings - 批量写入设置

use crate::AppState;
use crate::utils::response::storage_error;
use api_contract::{ApiResponse, SettingsDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_storage::{SettingStore, settings};

const KNOWN_KEYS: &[&str] = &[
    settings::SERVER_NAME,
    settings::PORT,
    settings::NAMESPACE_URI,
    settings::APPLICATION_URI,
    settings::POLLING_RATE,
    settings::ALLOW_ANONYMOUS,
    settings::OPCUA_USERNAME,
    settings::OPCUA_PASSWORD,
];

pub async fn get_settings(State(state): State<AppState>) -> Response {
    match state.settings.all().await {
        Ok(mut map) => {
            for key in KNOWN_KEYS {
                if !map.contains_key(*key) {
                    if let Some(default) = settings::default_for(key) {
                        map.insert((*key).to_string(), default.to_string());
                    }
                }
            }
            (
                StatusCode::OK,
                Json(ApiResponse::success(SettingsDto { settings: map })),
            )
                .into_response()
        }
        Err(err) => storage_error(err),
    }
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(req): Json<SettingsDto>,
) -> Response {
    for (key, value) in &req.settings {
        if let Err(err) = state.settings.set(key, value).await {
            return storage_error(err);
        }
    }
    get_settings(State(state)).await
}
