//! Library Query Handlers
//!
//! 书架条目在读取时与作品仓储做关联；作品已被删除的条目会被跳过

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;

use crate::application::commands::handlers::parse_reading_status;
use crate::application::error::ApplicationError;
use crate::application::ports::{LibraryRepositoryPort, StoryRepositoryPort};
use crate::application::queries::{GetLibraryStatus, GetLibrarySummary, ListLibrary};
use crate::domain::library::{LibraryEntry, ReadingStatus};
use crate::domain::story::Story;

// ============================================================================
// Response DTOs
// ============================================================================

/// 带书架信息的作品
///
/// 书架条目的更新时间以 `statusUpdatedAt` 输出，不覆盖作品自身的 `updatedAt`。
/// 需要条目时间的调用方应读取 `statusUpdatedAt`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStory {
    #[serde(flatten)]
    pub story: Story,
    pub library_status: ReadingStatus,
    pub added_at: DateTime<Utc>,
    pub status_updated_at: DateTime<Utc>,
}

impl LibraryStory {
    fn join(story: Story, entry: &LibraryEntry) -> Self {
        Self {
            story,
            library_status: entry.status,
            added_at: entry.added_at,
            status_updated_at: entry.updated_at,
        }
    }
}

/// 书架分区计数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySummary {
    pub want_to_read: usize,
    pub currently_reading: usize,
    pub completed: usize,
    pub total: usize,
}

impl LibrarySummary {
    pub fn count(&self, status: ReadingStatus) -> usize {
        match status {
            ReadingStatus::WantToRead => self.want_to_read,
            ReadingStatus::CurrentlyReading => self.currently_reading,
            ReadingStatus::Completed => self.completed,
        }
    }
}

/// 并发解析条目对应的作品，丢弃已删除作品的条目
async fn resolve(
    story_repo: &dyn StoryRepositoryPort,
    entries: Vec<LibraryEntry>,
) -> Result<Vec<LibraryStory>, ApplicationError> {
    let lookups = join_all(entries.iter().map(|e| story_repo.find_by_id(e.story_id))).await;

    let mut resolved = Vec::with_capacity(entries.len());
    for (entry, lookup) in entries.iter().zip(lookups) {
        match lookup? {
            Some(story) => resolved.push(LibraryStory::join(story, entry)),
            None => tracing::warn!(
                story_id = %entry.story_id,
                status = %entry.status,
                "Library entry refers to a missing story, skipped"
            ),
        }
    }
    Ok(resolved)
}

// ============================================================================
// Handlers
// ============================================================================

/// ListLibrary Handler
pub struct ListLibraryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    library_repo: Arc<dyn LibraryRepositoryPort>,
}

impl ListLibraryHandler {
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        library_repo: Arc<dyn LibraryRepositoryPort>,
    ) -> Self {
        Self {
            story_repo,
            library_repo,
        }
    }

    pub async fn handle(&self, query: ListLibrary) -> Result<Vec<LibraryStory>, ApplicationError> {
        let filter = query
            .status
            .as_deref()
            .map(parse_reading_status)
            .transpose()?;

        let entries: Vec<LibraryEntry> = self
            .library_repo
            .entries()
            .await
            .into_iter()
            .filter(|e| filter.map_or(true, |status| e.status == status))
            .collect();

        resolve(self.story_repo.as_ref(), entries).await
    }
}

/// GetLibraryStatus Handler
///
/// 不在书架中返回 None
pub struct GetLibraryStatusHandler {
    library_repo: Arc<dyn LibraryRepositoryPort>,
}

impl GetLibraryStatusHandler {
    pub fn new(library_repo: Arc<dyn LibraryRepositoryPort>) -> Self {
        Self { library_repo }
    }

    pub async fn handle(
        &self,
        query: GetLibraryStatus,
    ) -> Result<Option<ReadingStatus>, ApplicationError> {
        Ok(self.library_repo.get_status(query.story_id).await)
    }
}

/// GetLibrarySummary Handler
pub struct GetLibrarySummaryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    library_repo: Arc<dyn LibraryRepositoryPort>,
}

impl GetLibrarySummaryHandler {
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        library_repo: Arc<dyn LibraryRepositoryPort>,
    ) -> Self {
        Self {
            story_repo,
            library_repo,
        }
    }

    pub async fn handle(&self, _query: GetLibrarySummary) -> Result<LibrarySummary, ApplicationError> {
        let entries = self.library_repo.entries().await;
        let stories = resolve(self.story_repo.as_ref(), entries).await?;

        let mut summary = LibrarySummary::default();
        for item in &stories {
            match item.library_status {
                ReadingStatus::WantToRead => summary.want_to_read += 1,
                ReadingStatus::CurrentlyReading => summary.currently_reading += 1,
                ReadingStatus::Completed => summary.completed += 1,
            }
        }
        summary.total = stories.len();

        Ok(summary)
    }
}
