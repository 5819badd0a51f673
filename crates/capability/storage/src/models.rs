//! 数据模型
//!
//! 节点定义与量程配置在 `domain` crate 中定义（跨能力共享），
//! 这里只保留存储侧特有的结构。

/// 用户记录。
///
/// `password_hash` 可能是 argon2 哈希或遗留明文（由 auth 能力区分处理）。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub enabled: bool,
}
