//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - NodeDefinitionStore: InMemoryNodeDefinitionStore
//! - SettingStore: InMemorySettingStore
//! - UserStore: InMemoryUserStore

pub mod node;
pub mod setting;
pub mod user;

pub use node::*;
pub use setting::*;
pub use user::*;
