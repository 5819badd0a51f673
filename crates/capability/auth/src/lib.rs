//! 会话鉴权能力。
//!
//! 把协议会话层的认证回调桥接到用户/设置存储：
//! - 匿名尝试只看 `allow_anonymous` 开关，通过后给只读主体
//! - 专用共享凭据对（opcua_username / opcua_password）给管理员主体，
//!   不要求存在对应用户记录
//! - 其余走用户存储：禁用或口令不符一律拒绝
//!
//! 每次回调重新读取设置与用户记录，不缓存任何角色状态。

mod password;

use async_trait::async_trait;
use bridge_protocol::SessionAuthorizer;
use bridge_storage::{SettingStore, UserStore, settings};
use domain::{Permission, Principal, Role};
use std::collections::HashSet;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

pub use password::{hash_password, verify_password};

/// 鉴权相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("internal error: {0}")]
    Internal(String),
}

/// 存储支撑的会话鉴权器。
pub struct AuthorizationBridge {
    users: Arc<dyn UserStore>,
    settings: Arc<dyn SettingStore>,
}

impl AuthorizationBridge {
    pub fn new(users: Arc<dyn UserStore>, settings: Arc<dyn SettingStore>) -> Self {
        Self { users, settings }
    }

    async fn setting(&self, key: &str) -> Option<String> {
        match self.settings.get(key).await {
            Ok(value) => value.or_else(|| settings::default_for(key).map(str::to_string)),
            Err(err) => {
                warn!(target: "bridge.auth", "setting lookup failed for {}: {}", key, err);
                settings::default_for(key).map(str::to_string)
            }
        }
    }

    async fn anonymous_allowed(&self) -> bool {
        self.setting(settings::ALLOW_ANONYMOUS)
            .await
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// 专用共享凭据校验：两个键都配置且同时匹配才算命中。
    async fn matches_shared_credentials(&self, username: &str, password: &str) -> bool {
        let (Some(expected_user), Some(expected_password)) = (
            self.setting(settings::OPCUA_USERNAME).await,
            self.setting(settings::OPCUA_PASSWORD).await,
        ) else {
            return false;
        };
        if expected_user.is_empty() {
            return false;
        }
        let user_ok: bool = expected_user.as_bytes().ct_eq(username.as_bytes()).into();
        let password_ok: bool = expected_password.as_bytes().ct_eq(password.as_bytes()).into();
        user_ok && password_ok
    }

    async fn authenticate_stored_user(&self, username: &str, password: &str) -> Option<Principal> {
        let record = match self.users.find_by_username(username).await {
            Ok(record) => record?,
            Err(err) => {
                warn!(target: "bridge.auth", "user lookup failed for {}: {}", username, err);
                return None;
            }
        };
        if !record.enabled {
            debug!(target: "bridge.auth", "rejected disabled user {}", username);
            return None;
        }
        match verify_password(&record.password_hash, password) {
            Ok(true) => Some(Principal::new(record.username, Role::parse(&record.role))),
            Ok(false) => None,
            Err(err) => {
                warn!(target: "bridge.auth", "password verification failed for {}: {}", username, err);
                None
            }
        }
    }
}

#[async_trait]
impl SessionAuthorizer for AuthorizationBridge {
    async fn authenticate(&self, username: Option<&str>, password: &str) -> Option<Principal> {
        let principal = match username.filter(|name| !name.is_empty()) {
            None => {
                if self.anonymous_allowed().await {
                    Some(Principal::anonymous())
                } else {
                    debug!(target: "bridge.auth", "anonymous session rejected");
                    None
                }
            }
            Some(username) => {
                if self.matches_shared_credentials(username, password).await {
                    Some(Principal::new(username, Role::Admin))
                } else {
                    self.authenticate_stored_user(username, password).await
                }
            }
        };
        match &principal {
            Some(principal) => {
                bridge_telemetry::record_auth_success();
                debug!(
                    target: "bridge.auth",
                    "session authenticated: {} ({})", principal.username, principal.role.as_str()
                );
            }
            None => bridge_telemetry::record_auth_failure(),
        }
        principal
    }

    fn permissions(&self, principal: &Principal) -> HashSet<Permission> {
        match principal.role {
            Role::Admin | Role::Operator => {
                HashSet::from([Permission::Read, Permission::Write, Permission::Browse])
            }
            Role::ReadOnly => HashSet::from([Permission::Read, Permission::Browse]),
        }
    }
}
