//! In-Memory Story Repository

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::SimulatedLatency;
use crate::application::ports::{
    RepositoryError, StoryRepositoryPort, FEATURED_LIMIT, TRENDING_LIMIT,
};
use crate::domain::story::{AuthorRef, NewStory, Story, StoryId, StoryPatch};
use crate::domain::IdAllocator;

/// 各操作的模拟延迟（毫秒）
mod delay {
    pub const LIST: u64 = 300;
    pub const GET: u64 = 200;
    pub const BY_AUTHOR: u64 = 250;
    pub const BY_GENRE: u64 = 300;
    pub const FEATURED: u64 = 350;
    pub const TRENDING: u64 = 400;
    pub const SEARCH: u64 = 350;
    pub const CREATE: u64 = 500;
    pub const UPDATE: u64 = 400;
    pub const DELETE: u64 = 300;
    pub const INCREMENT_VIEWS: u64 = 100;
}

struct StoryState {
    stories: Vec<Story>,
    ids: IdAllocator,
}

/// 内存作品仓储
pub struct InMemoryStoryRepository {
    state: RwLock<StoryState>,
    latency: SimulatedLatency,
}

impl InMemoryStoryRepository {
    /// 以种子数据创建仓储
    pub fn new(stories: Vec<Story>) -> Self {
        let ids = IdAllocator::seeded(stories.iter().map(|s| s.id.value()));
        Self {
            state: RwLock::new(StoryState { stories, ids }),
            latency: SimulatedLatency::disabled(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_latency(mut self, latency: SimulatedLatency) -> Self {
        self.latency = latency;
        self
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Story>
    where
        F: Fn(&Story) -> bool,
    {
        let state = self.state.read().await;
        state.stories.iter().filter(|&s| predicate(s)).cloned().collect()
    }
}

impl Default for InMemoryStoryRepository {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl StoryRepositoryPort for InMemoryStoryRepository {
    async fn list(&self) -> Result<Vec<Story>, RepositoryError> {
        self.latency.pause(delay::LIST).await;
        Ok(self.state.read().await.stories.clone())
    }

    async fn find_by_id(&self, id: StoryId) -> Result<Option<Story>, RepositoryError> {
        self.latency.pause(delay::GET).await;
        let state = self.state.read().await;
        Ok(state.stories.iter().find(|s| s.id == id).cloned())
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Story>, RepositoryError> {
        self.latency.pause(delay::BY_AUTHOR).await;
        Ok(self.filtered(|s| s.author_id == author_id).await)
    }

    async fn list_by_genre(&self, genre: &str) -> Result<Vec<Story>, RepositoryError> {
        self.latency.pause(delay::BY_GENRE).await;
        Ok(self.filtered(|s| s.has_genre(genre)).await)
    }

    async fn list_featured(&self) -> Result<Vec<Story>, RepositoryError> {
        self.latency.pause(delay::FEATURED).await;
        let mut stories = self.filtered(Story::is_published).await;
        stories.sort_by(|a, b| b.views.cmp(&a.views));
        stories.truncate(FEATURED_LIMIT);
        Ok(stories)
    }

    async fn list_trending(&self) -> Result<Vec<Story>, RepositoryError> {
        self.latency.pause(delay::TRENDING).await;
        let mut stories = self.filtered(Story::is_published).await;
        stories.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        stories.truncate(TRENDING_LIMIT);
        Ok(stories)
    }

    async fn search(&self, term: &str) -> Result<Vec<Story>, RepositoryError> {
        self.latency.pause(delay::SEARCH).await;
        let needle = term.to_lowercase();
        let results = self.filtered(|s| s.matches(&needle)).await;
        tracing::debug!(term = %term, matches = results.len(), "Story search");
        Ok(results)
    }

    async fn create(&self, data: NewStory, author: AuthorRef) -> Result<Story, RepositoryError> {
        self.latency.pause(delay::CREATE).await;
        let mut state = self.state.write().await;

        let id = StoryId::new(state.ids.allocate());
        let story = Story::new(id, data, author, Utc::now());
        state.stories.insert(0, story.clone());

        Ok(story)
    }

    async fn update(
        &self,
        id: StoryId,
        patch: StoryPatch,
    ) -> Result<Option<Story>, RepositoryError> {
        self.latency.pause(delay::UPDATE).await;
        let mut state = self.state.write().await;

        Ok(state.stories.iter_mut().find(|s| s.id == id).map(|story| {
            story.apply(patch, Utc::now());
            story.clone()
        }))
    }

    async fn delete(&self, id: StoryId) -> Result<Option<Story>, RepositoryError> {
        self.latency.pause(delay::DELETE).await;
        let mut state = self.state.write().await;

        Ok(state
            .stories
            .iter()
            .position(|s| s.id == id)
            .map(|index| state.stories.remove(index)))
    }

    async fn increment_views(&self, id: StoryId) -> Result<u64, RepositoryError> {
        self.latency.pause(delay::INCREMENT_VIEWS).await;
        let mut state = self.state.write().await;

        match state.stories.iter_mut().find(|s| s.id == id) {
            Some(story) => {
                story.views += 1;
                Ok(story.views)
            }
            None => {
                tracing::debug!(story_id = %id, "View increment for unknown story ignored");
                Ok(0)
            }
        }
    }
}
