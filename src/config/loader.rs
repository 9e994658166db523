//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `STORYSHELF_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `STORYSHELF_AUTHOR__NAME=Ada`
/// - `STORYSHELF_STORAGE__LIBRARY_DB=/data/library.sled`
/// - `STORYSHELF_LATENCY__ENABLED=true`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("author.id", "current-user")?
        .set_default("author.name", "Current User")?
        .set_default("storage.library_db", "data/library.sled")?
        .set_default("storage.library_key", "storyshelf.library")?
        .set_default("latency.enabled", false)?
        .set_default("latency.scale", 1.0)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: STORYSHELF_LOG__LEVEL=debug
    builder = builder.add_source(
        Environment::with_prefix("STORYSHELF")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.author.id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Author id cannot be empty".to_string(),
        ));
    }

    if config.storage.library_db.is_empty() {
        return Err(ConfigError::ValidationError(
            "Library database path cannot be empty".to_string(),
        ));
    }

    if config.storage.library_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "Library storage key cannot be empty".to_string(),
        ));
    }

    if !config.latency.scale.is_finite() || config.latency.scale < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "Latency scale must be a non-negative number, got {}",
            config.latency.scale
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Author: {} ({})", config.author.name, config.author.id);
    match (&config.seed.stories_path, &config.seed.chapters_path) {
        (None, None) => tracing::info!("Seed: embedded fixtures"),
        (stories, chapters) => tracing::info!("Seed: stories={:?} chapters={:?}", stories, chapters),
    }
    tracing::info!("Library DB: {}", config.storage.library_db);
    tracing::info!("Library Key: {}", config.storage.library_key);
    tracing::info!("Latency Enabled: {}", config.latency.enabled);
    if config.latency.enabled {
        tracing::info!("Latency Scale: {}", config.latency.scale);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
