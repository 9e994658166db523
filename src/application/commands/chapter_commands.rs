//! Chapter Commands

use crate::domain::chapter::{ChapterId, ChapterPatch};
use crate::domain::story::StoryId;

/// 创建章节命令
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub story_id: StoryId,
    pub title: String,
    pub content: String,
}

/// 更新章节命令
#[derive(Debug, Clone)]
pub struct UpdateChapter {
    pub chapter_id: ChapterId,
    pub patch: ChapterPatch,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub chapter_id: ChapterId,
}

/// 章节重排命令
///
/// `ordered_ids` 必须恰好包含该作品的全部章节
#[derive(Debug, Clone)]
pub struct ReorderChapters {
    pub story_id: StoryId,
    pub ordered_ids: Vec<ChapterId>,
}
