//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 当前用户（单用户场景下新建作品的作者）
    #[serde(default)]
    pub author: AuthorConfig,

    /// 种子数据配置
    #[serde(default)]
    pub seed: SeedConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 模拟延迟配置
    #[serde(default)]
    pub latency: LatencyConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 当前用户配置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorConfig {
    #[serde(default = "default_author_id")]
    pub id: String,

    #[serde(default = "default_author_name")]
    pub name: String,
}

fn default_author_id() -> String {
    "current-user".to_string()
}

fn default_author_name() -> String {
    "Current User".to_string()
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            id: default_author_id(),
            name: default_author_name(),
        }
    }
}

/// 种子数据配置
///
/// 未设置路径时使用内置 fixtures
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub stories_path: Option<PathBuf>,

    #[serde(default)]
    pub chapters_path: Option<PathBuf>,
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 书架数据库（Sled）路径
    #[serde(default = "default_library_db")]
    pub library_db: String,

    /// 书架数据的存储键
    #[serde(default = "default_library_key")]
    pub library_key: String,
}

fn default_library_db() -> String {
    "data/library.sled".to_string()
}

fn default_library_key() -> String {
    crate::infrastructure::persistence::DEFAULT_LIBRARY_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            library_db: default_library_db(),
            library_key: default_library_key(),
        }
    }
}

/// 模拟延迟配置
#[derive(Debug, Clone, Deserialize)]
pub struct LatencyConfig {
    /// 是否启用
    #[serde(default)]
    pub enabled: bool,

    /// 延迟倍率（1.0 = 原始延迟）
    #[serde(default = "default_latency_scale")]
    pub scale: f64,
}

fn default_latency_scale() -> f64 {
    1.0
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scale: default_latency_scale(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.author.id, "current-user");
        assert_eq!(config.storage.library_db, "data/library.sled");
        assert_eq!(config.storage.library_key, "storyshelf.library");
        assert!(!config.latency.enabled);
        assert!(config.seed.stories_path.is_none());
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"author": {"name": "Ada"}, "latency": {"enabled": true}}"#)
                .unwrap();
        assert_eq!(config.author.name, "Ada");
        assert_eq!(config.author.id, "current-user");
        assert!(config.latency.enabled);
        assert_eq!(config.latency.scale, 1.0);
        assert_eq!(config.log.level, "info");
    }
}
