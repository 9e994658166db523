//! Storyshelf - 连载小说数据服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story Context: 作品管理
//! - Chapter Context: 章节管理（编号连续性）
//! - Library Context: 读者书架（阅读状态）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（StoryRepository, ChapterRepository, LibraryRepository, KeyValueStore）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Memory: 作品、章节内存仓储，模拟延迟
//! - Persistence: Sled 键值存储 + 书架叠加层
//! - Seed: 启动数据集
//! - State: 服务容器

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
pub use infrastructure::AppState;
