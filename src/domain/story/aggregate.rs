//! Story Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{StoryId, StoryStatus};

/// 作品作者引用（单用户场景下即当前用户）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    pub name: String,
}

impl AuthorRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Story 聚合根
///
/// 不变量:
/// - id 创建后不可变
/// - 每次经由 update 的修改都会刷新 updated_at
///
/// chapter_count 是冗余存储的字段，由章节命令负责同步
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub status: StoryStatus,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub chapter_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建作品所需的字段（由调用方提交）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStory {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub cover_image: Option<String>,
}

/// 作品部分更新
///
/// 只有 `Some` 的字段会被合并。`cover_image` 使用 `Some(None)` 表示清除封面
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub cover_image: Option<Option<String>>,
    pub status: Option<StoryStatus>,
    pub chapter_count: Option<u32>,
}

impl StoryPatch {
    pub fn status(status: StoryStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn chapter_count(count: u32) -> Self {
        Self {
            chapter_count: Some(count),
            ..Self::default()
        }
    }
}

impl Story {
    /// 创建草稿状态的新作品
    pub fn new(id: StoryId, data: NewStory, author: AuthorRef, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            genre: data.genre,
            author_id: author.id,
            author_name: author.name,
            cover_image: data.cover_image,
            status: StoryStatus::Draft,
            views: 0,
            chapter_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// 合并部分更新并刷新 updated_at
    pub fn apply(&mut self, patch: StoryPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(cover_image) = patch.cover_image {
            self.cover_image = cover_image;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(chapter_count) = patch.chapter_count {
            self.chapter_count = chapter_count;
        }
        self.updated_at = now;
    }

    pub fn is_published(&self) -> bool {
        self.status == StoryStatus::Published
    }

    /// 分类精确匹配（忽略大小写）
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre.to_lowercase() == genre.to_lowercase()
    }

    /// 搜索匹配：标题、简介、作者名、分类任一包含关键字（忽略大小写）
    ///
    /// `needle` 需已转为小写
    pub fn matches(&self, needle: &str) -> bool {
        [&self.title, &self.description, &self.author_name, &self.genre]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Story {
        let now = Utc::now();
        Story::new(
            StoryId::new(1),
            NewStory {
                title: "The Lantern Keeper".to_string(),
                description: "A lighthouse at the end of the world".to_string(),
                genre: "Mystery".to_string(),
                cover_image: None,
            },
            AuthorRef::new("u-1", "Ada Quill"),
            now,
        )
    }

    #[test]
    fn test_new_story_defaults() {
        let story = sample();
        assert_eq!(story.status, StoryStatus::Draft);
        assert_eq!(story.views, 0);
        assert_eq!(story.chapter_count, 0);
        assert_eq!(story.created_at, story.updated_at);
        assert_eq!(story.author_name, "Ada Quill");
    }

    #[test]
    fn test_apply_only_touches_patched_fields() {
        let original = sample();
        let mut story = original.clone();
        let later = original.updated_at + chrono::Duration::seconds(5);

        story.apply(
            StoryPatch {
                genre: Some("Fantasy".to_string()),
                ..StoryPatch::default()
            },
            later,
        );

        assert_eq!(story.genre, "Fantasy");
        assert_eq!(story.updated_at, later);
        assert_eq!(
            Story {
                genre: original.genre.clone(),
                updated_at: original.updated_at,
                ..story
            },
            original
        );
    }

    #[test]
    fn test_cover_image_can_be_cleared() {
        let mut story = sample();
        story.cover_image = Some("https://img.example/cover.png".to_string());
        story.apply(
            StoryPatch {
                cover_image: Some(None),
                ..StoryPatch::default()
            },
            Utc::now(),
        );
        assert!(story.cover_image.is_none());
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let story = sample();
        assert!(story.matches("myst"));
        assert!(story.matches("lighthouse"));
        assert!(story.matches("quill"));
        assert!(!story.matches("dragon"));
        assert!(story.has_genre("mystery"));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["authorName"], "Ada Quill");
        assert_eq!(json["chapterCount"], 0);
        assert_eq!(json["status"], "draft");
        assert!(json.get("coverImage").is_none());
    }
}
