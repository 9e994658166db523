//! Chapter Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::ChapterRepositoryPort;
use crate::application::queries::{
    Direction, GetAdjacentChapter, GetChapter, GetChapterByNumber, ListChapters,
};
use crate::domain::chapter::Chapter;

/// ListChapters Handler
///
/// 作品没有章节（或不存在）时返回空列表
pub struct ListChaptersHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, query: ListChapters) -> Result<Vec<Chapter>, ApplicationError> {
        Ok(self.chapter_repo.list_by_story(query.story_id).await?)
    }
}

/// GetChapter Handler
pub struct GetChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<Chapter, ApplicationError> {
        self.chapter_repo
            .find_by_id(query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id.value()))
    }
}

/// GetChapterByNumber Handler（阅读页按编号定位章节）
pub struct GetChapterByNumberHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetChapterByNumberHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, query: GetChapterByNumber) -> Result<Chapter, ApplicationError> {
        self.chapter_repo
            .find_by_number(query.story_id, query.chapter_number)
            .await?
            .ok_or_else(|| {
                tracing::debug!(
                    story_id = %query.story_id,
                    chapter_number = query.chapter_number,
                    "Chapter number not found"
                );
                ApplicationError::not_found("Chapter", query.chapter_number)
            })
    }
}

/// GetAdjacentChapter Handler
///
/// 已在首章/末章时返回 None
pub struct GetAdjacentChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetAdjacentChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(
        &self,
        query: GetAdjacentChapter,
    ) -> Result<Option<Chapter>, ApplicationError> {
        let chapter = match query.direction {
            Direction::Next => {
                self.chapter_repo
                    .next(query.story_id, query.current_number)
                    .await?
            }
            Direction::Previous => {
                self.chapter_repo
                    .previous(query.story_id, query.current_number)
                    .await?
            }
        };
        Ok(chapter)
    }
}
