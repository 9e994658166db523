//! Key-Value Store Port - 本地键值存储
//!
//! 书架叠加层所依赖的持久化介质抽象（字符串键 -> 字符串值），
//! 具体实现使用 Sled（磁盘）或内存 Map（测试）

use async_trait::async_trait;
use thiserror::Error;

/// Key-Value Store 错误
#[derive(Debug, Error)]
pub enum KeyValueError {
    #[error("Invalid UTF-8 value under key {key}: {message}")]
    Encoding { key: String, message: String },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Key-Value Store Port
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// 读取键对应的值，不存在时返回 None
    async fn get_item(&self, key: &str) -> Result<Option<String>, KeyValueError>;

    /// 写入（覆盖）键值
    async fn set_item(&self, key: &str, value: &str) -> Result<(), KeyValueError>;

    /// 删除键，键不存在时不报错
    async fn remove_item(&self, key: &str) -> Result<(), KeyValueError>;
}
