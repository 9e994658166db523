//! Chapter Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{count_words, ChapterId};
use crate::domain::story::StoryId;

/// 章节
///
/// 不变量:
/// - 同一作品内 chapter_number 恰好构成 1..=N，无空洞、无重复
/// - word_count 始终与 content 一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    pub story_id: StoryId,
    pub chapter_number: u32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub word_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建章节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChapter {
    pub story_id: StoryId,
    pub title: String,
    pub content: String,
}

/// 章节部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Chapter {
    pub fn new(id: ChapterId, chapter_number: u32, data: NewChapter, now: DateTime<Utc>) -> Self {
        let word_count = count_words(&data.content);
        Self {
            id,
            story_id: data.story_id,
            chapter_number,
            title: data.title,
            content: data.content,
            word_count,
            created_at: now,
            updated_at: now,
        }
    }

    /// 合并部分更新；修改正文时重新计算字数
    pub fn apply(&mut self, patch: ChapterPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.word_count = count_words(&content);
            self.content = content;
        }
        self.updated_at = now;
    }
}

/// 按当前编号排序后重新编号为 1..=N
///
/// 传入的章节应属于同一作品。返回编号发生变化的章节数
pub fn renumber<'a>(chapters: impl IntoIterator<Item = &'a mut Chapter>) -> usize {
    let mut chapters: Vec<&mut Chapter> = chapters.into_iter().collect();
    chapters.sort_by_key(|c| c.chapter_number);

    let mut changed = 0;
    for (index, chapter) in chapters.into_iter().enumerate() {
        let number = index as u32 + 1;
        if chapter.chapter_number != number {
            chapter.chapter_number = number;
            changed += 1;
        }
    }
    changed
}
