//! Sled-based Key-Value Store
//!
//! 书架叠加层的磁盘介质：跨进程重启保留，作用域为单个数据目录

use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{KeyValueError, KeyValueStorePort};

/// Sled 键值存储配置
#[derive(Debug, Clone)]
pub struct SledStoreConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/library.sled".to_string(),
        }
    }
}

/// Sled 键值存储
pub struct SledKeyValueStore {
    db: Db,
}

impl SledKeyValueStore {
    /// 创建新的存储实例
    pub fn new(config: &SledStoreConfig) -> Result<Self, KeyValueError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| KeyValueError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            keys = db.len(),
            "SledKeyValueStore initialized"
        );

        Ok(Self { db })
    }

    /// 打开现有存储
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KeyValueError> {
        let config = SledStoreConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    async fn flush(&self) -> Result<(), KeyValueError> {
        self.db
            .flush_async()
            .await
            .map(|_| ())
            .map_err(|e| KeyValueError::IoError(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStorePort for SledKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        match self.db.get(key) {
            Ok(Some(data)) => String::from_utf8(data.to_vec())
                .map(Some)
                .map_err(|e| KeyValueError::Encoding {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
            Ok(None) => Ok(None),
            Err(e) => Err(KeyValueError::DatabaseError(e.to_string())),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        self.db
            .insert(key, value.as_bytes())
            .map_err(|e| KeyValueError::DatabaseError(e.to_string()))?;
        self.flush().await
    }

    async fn remove_item(&self, key: &str) -> Result<(), KeyValueError> {
        self.db
            .remove(key)
            .map_err(|e| KeyValueError::DatabaseError(e.to_string()))?;
        self.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_items_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kv.sled");

        {
            let store = SledKeyValueStore::open(&path).unwrap();
            store.set_item("library", "[]").await.unwrap();
            store.set_item("other", "x").await.unwrap();
            store.remove_item("other").await.unwrap();
        }

        let store = SledKeyValueStore::open(&path).unwrap();
        assert_eq!(store.get_item("library").await.unwrap().as_deref(), Some("[]"));
        assert!(store.get_item("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_utf8_value_is_an_error() {
        let dir = tempdir().unwrap();
        let store = SledKeyValueStore::open(dir.path().join("kv.sled")).unwrap();
        store.db.insert("bad", &[0xff, 0xfe][..]).unwrap();

        assert!(matches!(
            store.get_item("bad").await,
            Err(KeyValueError::Encoding { .. })
        ));
    }
}
