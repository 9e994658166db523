//! Story Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::StoryRepositoryPort;
use crate::application::queries::{
    GetAuthorStats, GetStory, ListFeaturedStories, ListStories, ListStoriesByAuthor,
    ListStoriesByGenre, ListTrendingStories, SearchStories,
};
use crate::domain::story::{Story, StoryStatus};

// ============================================================================
// Response DTOs
// ============================================================================

/// 作者统计（"我的作品"面板）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStats {
    pub published: usize,
    pub drafts: usize,
    pub total_views: u64,
}

impl AuthorStats {
    fn from_stories(stories: &[Story]) -> Self {
        stories.iter().fold(Self::default(), |mut stats, story| {
            match story.status {
                StoryStatus::Published => stats.published += 1,
                StoryStatus::Draft => stats.drafts += 1,
                StoryStatus::Archived => {}
            }
            stats.total_views += story.views;
            stats
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// ListStories Handler
pub struct ListStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, _query: ListStories) -> Result<Vec<Story>, ApplicationError> {
        Ok(self.story_repo.list().await?)
    }
}

/// GetStory Handler
pub struct GetStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl GetStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: GetStory) -> Result<Story, ApplicationError> {
        self.story_repo
            .find_by_id(query.story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", query.story_id.value()))
    }
}

/// ListStoriesByAuthor Handler
pub struct ListStoriesByAuthorHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListStoriesByAuthorHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: ListStoriesByAuthor) -> Result<Vec<Story>, ApplicationError> {
        Ok(self.story_repo.list_by_author(&query.author_id).await?)
    }
}

/// ListStoriesByGenre Handler
pub struct ListStoriesByGenreHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListStoriesByGenreHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: ListStoriesByGenre) -> Result<Vec<Story>, ApplicationError> {
        Ok(self.story_repo.list_by_genre(&query.genre).await?)
    }
}

/// ListFeaturedStories Handler
pub struct ListFeaturedStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListFeaturedStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, _query: ListFeaturedStories) -> Result<Vec<Story>, ApplicationError> {
        Ok(self.story_repo.list_featured().await?)
    }
}

/// ListTrendingStories Handler
pub struct ListTrendingStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListTrendingStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, _query: ListTrendingStories) -> Result<Vec<Story>, ApplicationError> {
        Ok(self.story_repo.list_trending().await?)
    }
}

/// SearchStories Handler
///
/// 空关键字匹配全部作品
pub struct SearchStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl SearchStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: SearchStories) -> Result<Vec<Story>, ApplicationError> {
        Ok(self.story_repo.search(&query.term).await?)
    }
}

/// GetAuthorStats Handler
pub struct GetAuthorStatsHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl GetAuthorStatsHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: GetAuthorStats) -> Result<AuthorStats, ApplicationError> {
        let stories = self.story_repo.list_by_author(&query.author_id).await?;
        Ok(AuthorStats::from_stories(&stories))
    }
}
