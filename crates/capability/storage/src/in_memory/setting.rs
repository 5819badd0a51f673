//! 服务器设置内存存储实现

use crate::error::StorageError;
use crate::traits::SettingStore;
use std::collections::HashMap;

/// 设置内存存储。
#[derive(Default)]
pub struct InMemorySettingStore {
    settings: std::sync::RwLock<HashMap<String, String>>,
}

impl InMemorySettingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一组设置（演示与测试用）。
    pub fn with_settings(entries: &[(&str, &str)]) -> Self {
        let settings = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self {
            settings: std::sync::RwLock::new(settings),
        }
    }
}

#[async_trait::async_trait]
impl SettingStore for InMemorySettingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let settings = self
            .settings
            .read()
            .map_err(|err| StorageError::new(format!("setting store lock poisoned: {}", err)))?;
        Ok(settings.get(key).cloned())
    }

    async fn all(&self) -> Result<HashMap<String, String>, StorageError> {
        let settings = self
            .settings
            .read()
            .map_err(|err| StorageError::new(format!("setting store lock poisoned: {}", err)))?;
        Ok(settings.clone())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut settings = self
            .settings
            .write()
            .map_err(|err| StorageError::new(format!("setting store lock poisoned: {}", err)))?;
        settings.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
