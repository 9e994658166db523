//! Seed Data - 启动数据集
//!
//! 作品与章节仓储在启动时从静态 JSON 数据初始化。
//! 默认使用编译进二进制的 fixtures，可通过配置替换为外部文件。

use std::path::Path;
use thiserror::Error;

use crate::config::SeedConfig;
use crate::domain::chapter::{count_words, Chapter};
use crate::domain::story::Story;

const EMBEDDED_STORIES: &str = include_str!("../../fixtures/stories.json");
const EMBEDDED_CHAPTERS: &str = include_str!("../../fixtures/chapters.json");

/// 种子数据加载错误
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse seed data from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("Duplicate {kind} id in seed data: {id}")]
    DuplicateId { kind: &'static str, id: u64 },
}

/// 启动数据集
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub stories: Vec<Story>,
    pub chapters: Vec<Chapter>,
}

impl SeedData {
    /// 内置数据集
    pub fn embedded() -> Result<Self, SeedError> {
        Self::from_json(EMBEDDED_STORIES, EMBEDDED_CHAPTERS, "embedded fixtures")
    }

    /// 从 JSON 文本解析
    ///
    /// 章节字数总是根据正文重新计算
    pub fn from_json(stories: &str, chapters: &str, source_name: &str) -> Result<Self, SeedError> {
        let stories: Vec<Story> = parse(stories, source_name)?;
        let mut chapters: Vec<Chapter> = parse(chapters, source_name)?;

        for chapter in &mut chapters {
            chapter.word_count = count_words(&chapter.content);
        }

        ensure_unique("story", stories.iter().map(|s| s.id.value()))?;
        ensure_unique("chapter", chapters.iter().map(|c| c.id.value()))?;

        Ok(Self { stories, chapters })
    }
}

fn parse<T: serde::de::DeserializeOwned>(json: &str, source_name: &str) -> Result<T, SeedError> {
    serde_json::from_str(json).map_err(|e| SeedError::Parse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

fn ensure_unique(kind: &'static str, ids: impl Iterator<Item = u64>) -> Result<(), SeedError> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SeedError::DuplicateId { kind, id });
        }
    }
    Ok(())
}

async fn read_or_embedded(path: Option<&Path>, embedded: &'static str) -> Result<String, SeedError> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SeedError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        None => Ok(embedded.to_string()),
    }
}

/// 按配置加载种子数据
pub async fn load_seed(config: &SeedConfig) -> Result<SeedData, SeedError> {
    let stories = read_or_embedded(config.stories_path.as_deref(), EMBEDDED_STORIES).await?;
    let chapters = read_or_embedded(config.chapters_path.as_deref(), EMBEDDED_CHAPTERS).await?;

    let source_name = match (&config.stories_path, &config.chapters_path) {
        (None, None) => "embedded fixtures".to_string(),
        (stories, chapters) => format!("{:?} / {:?}", stories, chapters),
    };

    let seed = SeedData::from_json(&stories, &chapters, &source_name)?;

    tracing::info!(
        source = %source_name,
        stories = seed.stories.len(),
        chapters = seed.chapters.len(),
        "Seed data loaded"
    );

    Ok(seed)
}
