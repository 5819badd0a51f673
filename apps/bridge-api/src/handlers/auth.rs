//! 凭据校验 handler
//!
//! POST /auth/check - 走与协议会话完全相同的鉴权路径，
//! 用于在不开协议客户端的情况下排查凭据配置。

use crate::AppState;
use crate::utils::response::auth_error;
use api_contract::{ApiResponse, AuthCheckRequest, PrincipalDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_protocol::SessionAuthorizer;

/// 校验一组凭据并返回解析出的主体与权限集。
pub async fn auth_check(
    State(state): State<AppState>,
    Json(req): Json<AuthCheckRequest>,
) -> Response {
    let username = req.username.as_deref().filter(|name| !name.is_empty());
    match state.authorizer.authenticate(username, &req.password).await {
        Some(principal) => {
            let mut permissions: Vec<String> = state
                .authorizer
                .permissions(&principal)
                .into_iter()
                .map(|permission| permission.as_str().to_string())
                .collect();
            permissions.sort();
            let dto = PrincipalDto {
                username: principal.username,
                role: principal.role.as_str().to_string(),
                permissions,
            };
            (StatusCode::OK, Json(ApiResponse::success(dto))).into_response()
        }
        None => auth_error(),
    }
}
