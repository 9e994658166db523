//! Chapter Queries

use crate::domain::chapter::ChapterId;
use crate::domain::story::StoryId;

/// 列出作品的所有章节
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub story_id: StoryId,
}

/// 获取章节详情
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub chapter_id: ChapterId,
}

/// 按章节编号获取章节
#[derive(Debug, Clone)]
pub struct GetChapterByNumber {
    pub story_id: StoryId,
    pub chapter_number: u32,
}

/// 相邻章节方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// 获取相邻章节
#[derive(Debug, Clone)]
pub struct GetAdjacentChapter {
    pub story_id: StoryId,
    pub current_number: u32,
    pub direction: Direction,
}
