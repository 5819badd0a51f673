//! # 存储能力抽象
//!
//! 持久化本身是外部协作方，本 crate 只定义桥接子系统消费的接口：
//!
//! - [`traits`]：节点定义 / 服务器设置 / 用户的异步存储接口
//! - [`models`]：存储相关数据结构（用户记录）
//! - [`settings`]：服务器设置键名与默认值
//! - [`error`]：统一的存储错误类型
//! - [`in_memory`]：内存实现（测试与演示用）
//!
//! 设计原则：
//! - 生命周期 / 调度器 / 鉴权桥只依赖 trait，不感知具体后端
//! - 所有接口返回 StorageError，调用方决定降级策略

pub mod error;
pub mod in_memory;
pub mod models;
pub mod settings;
pub mod traits;

pub use error::StorageError;
pub use in_memory::{InMemoryNodeDefinitionStore, InMemorySettingStore, InMemoryUserStore};
pub use models::UserRecord;
pub use traits::{NodeDefinitionStore, SettingStore, UserStore};
