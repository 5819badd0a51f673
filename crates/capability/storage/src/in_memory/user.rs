//! 用户内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 内置 admin 账户（用户名：admin，密码：admin123，遗留明文形态）
//! - 根据用户名查找用户

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use std::collections::HashMap;

/// 用户内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
#[derive(Default)]
pub struct InMemoryUserStore {
    users: std::sync::RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置 admin 账户
    ///
    /// 创建包含默认 admin 用户的存储。
    pub fn with_default_admin() -> Self {
        let mut users = HashMap::new();
        users.insert(
            "admin".to_string(),
            UserRecord {
                user_id: "user-1".to_string(),
                username: "admin".to_string(),
                password_hash: "admin123".to_string(),
                role: "Admin".to_string(),
                enabled: true,
            },
        );
        Self {
            users: std::sync::RwLock::new(users),
        }
    }

    /// 插入或覆盖一个用户（测试用）。
    pub fn upsert(&self, record: UserRecord) {
        if let Ok(mut users) = self.users.write() {
            users.insert(record.username.clone(), record);
        }
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .users
            .read()
            .ok()
            .and_then(|map| map.get(username).cloned()))
    }
}
