//! 存储接口 Trait 定义
//!
//! 定义桥接子系统消费的异步接口：
//! - NodeDefinitionStore：节点定义存储
//! - SettingStore：服务器设置存储（字符串键值对）
//! - UserStore：用户存储
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::UserRecord;
use async_trait::async_trait;
use domain::NodeDefinition;
use std::collections::HashMap;

/// 节点定义存储接口
///
/// `node_id` 在存储内唯一。
#[async_trait]
pub trait NodeDefinitionStore: Send + Sync {
    /// 列出所有启用的节点定义（setup 与轮询刷新使用）。
    async fn list_enabled(&self) -> Result<Vec<NodeDefinition>, StorageError>;

    /// 列出全部节点定义（管理面列表，含禁用项）。
    async fn list_all(&self) -> Result<Vec<NodeDefinition>, StorageError>;

    /// 查找指定节点定义。
    async fn find(&self, node_id: &str) -> Result<Option<NodeDefinition>, StorageError>;

    /// 插入新节点定义（node_id 冲突报错）。
    async fn insert(&self, definition: NodeDefinition) -> Result<(), StorageError>;

    /// 更新节点定义，返回是否存在。
    async fn update(&self, definition: NodeDefinition) -> Result<bool, StorageError>;

    /// 删除节点定义，返回是否存在。
    async fn delete(&self, node_id: &str) -> Result<bool, StorageError>;
}

/// 服务器设置存储接口。
#[async_trait]
pub trait SettingStore: Send + Sync {
    /// 读取单个设置。
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 读取全部设置。
    async fn all(&self) -> Result<HashMap<String, String>, StorageError>;

    /// 写入设置（存在则覆盖）。
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// 用户存储接口。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据用户名查找用户。
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;
}
