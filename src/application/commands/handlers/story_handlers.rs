//! Story Command Handlers

use std::sync::Arc;

use crate::application::commands::{
    ArchiveStory, CreateStory, DeleteStory, IncrementViews, PublishStory, UnpublishStory,
    UpdateStory,
};
use crate::application::error::ApplicationError;
use crate::application::ports::StoryRepositoryPort;
use crate::domain::story::{AuthorRef, NewStory, Story, StoryId, StoryPatch, StoryStatus, Title};

/// 必填文本字段：去除首尾空白后不能为空
fn required(field: &str, value: &str) -> Result<String, ApplicationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApplicationError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn title(value: &str) -> Result<String, ApplicationError> {
    Title::new(value)
        .map(Title::into_inner)
        .map_err(ApplicationError::validation)
}

/// 空白封面地址视为未设置
fn cover(value: Option<String>) -> Option<String> {
    value
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

// ============================================================================
// CreateStory
// ============================================================================

/// CreateStory Handler
pub struct CreateStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    author: AuthorRef,
}

impl CreateStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, author: AuthorRef) -> Self {
        Self { story_repo, author }
    }

    pub async fn handle(&self, command: CreateStory) -> Result<Story, ApplicationError> {
        let data = NewStory {
            title: title(&command.title)?,
            description: required("Description", &command.description)?,
            genre: required("Genre", &command.genre)?,
            cover_image: cover(command.cover_image),
        };

        let story = self.story_repo.create(data, self.author.clone()).await?;

        tracing::info!(
            story_id = %story.id,
            title = %story.title,
            author_id = %story.author_id,
            "Story created"
        );

        Ok(story)
    }
}

// ============================================================================
// UpdateStory
// ============================================================================

/// UpdateStory Handler
pub struct UpdateStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl UpdateStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: UpdateStory) -> Result<Story, ApplicationError> {
        let mut patch = command.patch;
        if let Some(value) = patch.title.as_deref() {
            patch.title = Some(title(value)?);
        }
        if let Some(value) = patch.description.as_deref() {
            patch.description = Some(required("Description", value)?);
        }
        if let Some(value) = patch.genre.as_deref() {
            patch.genre = Some(required("Genre", value)?);
        }
        patch.cover_image = patch.cover_image.map(cover);

        let story = self
            .story_repo
            .update(command.story_id, patch)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", command.story_id.value()))?;

        tracing::info!(story_id = %story.id, "Story updated");

        Ok(story)
    }
}

// ============================================================================
// DeleteStory
// ============================================================================

/// DeleteStory Handler
///
/// 不级联删除章节与书架条目，书架在读取时跳过已删除的作品
pub struct DeleteStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl DeleteStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: DeleteStory) -> Result<Story, ApplicationError> {
        let story = self
            .story_repo
            .delete(command.story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", command.story_id.value()))?;

        tracing::info!(
            story_id = %story.id,
            title = %story.title,
            "Story deleted"
        );

        Ok(story)
    }
}

// ============================================================================
// Publish / Unpublish / Archive
// ============================================================================

async fn set_status(
    story_repo: &dyn StoryRepositoryPort,
    story_id: StoryId,
    status: StoryStatus,
) -> Result<Story, ApplicationError> {
    let story = story_repo
        .update(story_id, StoryPatch::status(status))
        .await?
        .ok_or_else(|| ApplicationError::not_found("Story", story_id.value()))?;

    tracing::info!(story_id = %story.id, status = %status, "Story status changed");

    Ok(story)
}

/// PublishStory Handler
pub struct PublishStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl PublishStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: PublishStory) -> Result<Story, ApplicationError> {
        set_status(self.story_repo.as_ref(), command.story_id, StoryStatus::Published).await
    }
}

/// UnpublishStory Handler
pub struct UnpublishStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl UnpublishStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: UnpublishStory) -> Result<Story, ApplicationError> {
        set_status(self.story_repo.as_ref(), command.story_id, StoryStatus::Draft).await
    }
}

/// ArchiveStory Handler
pub struct ArchiveStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ArchiveStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: ArchiveStory) -> Result<Story, ApplicationError> {
        set_status(self.story_repo.as_ref(), command.story_id, StoryStatus::Archived).await
    }
}

// ============================================================================
// IncrementViews
// ============================================================================

/// IncrementViews Handler
///
/// 作品不存在时返回 0，不报错
pub struct IncrementViewsHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl IncrementViewsHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: IncrementViews) -> Result<u64, ApplicationError> {
        let views = self.story_repo.increment_views(command.story_id).await?;
        tracing::debug!(story_id = %command.story_id, views, "Story views incremented");
        Ok(views)
    }
}
