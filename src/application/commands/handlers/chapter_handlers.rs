//! Chapter Command Handlers
//!
//! 创建/删除章节后会把作品的 chapter_count 同步为实际章节数

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::commands::{CreateChapter, DeleteChapter, ReorderChapters, UpdateChapter};
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRepositoryPort, StoryRepositoryPort};
use crate::domain::chapter::{Chapter, NewChapter};
use crate::domain::story::{StoryId, StoryPatch};

/// 章节标题最少字符数
pub const MIN_CHAPTER_TITLE_CHARS: usize = 3;

/// 章节正文最少字符数
pub const MIN_CHAPTER_CONTENT_CHARS: usize = 10;

fn min_chars(field: &str, value: &str, min: usize) -> Result<String, ApplicationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() < min {
        return Err(ApplicationError::validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    Ok(trimmed.to_string())
}

/// 返回作品是否仍然存在
async fn sync_chapter_count(
    story_repo: &dyn StoryRepositoryPort,
    chapter_repo: &dyn ChapterRepositoryPort,
    story_id: StoryId,
) -> Result<bool, ApplicationError> {
    let count = chapter_repo.count_by_story(story_id).await?;
    let count = u32::try_from(count)
        .map_err(|_| ApplicationError::internal(format!("Chapter count overflow: {}", count)))?;

    let synced = story_repo
        .update(story_id, StoryPatch::chapter_count(count))
        .await?
        .is_some();
    if synced {
        tracing::debug!(story_id = %story_id, count, "Chapter count synchronised");
    } else {
        tracing::debug!(story_id = %story_id, "Story gone, chapter count not synchronised");
    }
    Ok(synced)
}

// ============================================================================
// CreateChapter
// ============================================================================

/// CreateChapter Handler
///
/// 创建期间作品被删除时撤销新章节并返回 NotFound
pub struct CreateChapterHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl CreateChapterHandler {
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            story_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, command: CreateChapter) -> Result<Chapter, ApplicationError> {
        let title = min_chars("Chapter title", &command.title, MIN_CHAPTER_TITLE_CHARS)?;
        let content = min_chars("Chapter content", &command.content, MIN_CHAPTER_CONTENT_CHARS)?;

        // 检查作品是否存在
        self.story_repo
            .find_by_id(command.story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", command.story_id.value()))?;

        let chapter = self
            .chapter_repo
            .create(NewChapter {
                story_id: command.story_id,
                title,
                content,
            })
            .await?;

        let story_alive = sync_chapter_count(
            self.story_repo.as_ref(),
            self.chapter_repo.as_ref(),
            chapter.story_id,
        )
        .await?;
        if !story_alive {
            self.chapter_repo.delete(chapter.id).await?;
            tracing::warn!(
                chapter_id = %chapter.id,
                story_id = %chapter.story_id,
                "Story deleted while chapter was being created, chapter discarded"
            );
            return Err(ApplicationError::not_found("Story", chapter.story_id.value()));
        }

        tracing::info!(
            chapter_id = %chapter.id,
            story_id = %chapter.story_id,
            chapter_number = chapter.chapter_number,
            word_count = chapter.word_count,
            "Chapter created"
        );

        Ok(chapter)
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// UpdateChapter Handler
pub struct UpdateChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl UpdateChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<Chapter, ApplicationError> {
        let mut patch = command.patch;
        if let Some(value) = patch.title.as_deref() {
            patch.title = Some(min_chars("Chapter title", value, MIN_CHAPTER_TITLE_CHARS)?);
        }
        if let Some(value) = patch.content.as_deref() {
            patch.content = Some(min_chars(
                "Chapter content",
                value,
                MIN_CHAPTER_CONTENT_CHARS,
            )?);
        }

        let chapter = self
            .chapter_repo
            .update(command.chapter_id, patch)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id.value()))?;

        tracing::info!(
            chapter_id = %chapter.id,
            story_id = %chapter.story_id,
            "Chapter updated"
        );

        Ok(chapter)
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler
pub struct DeleteChapterHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl DeleteChapterHandler {
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            story_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<Chapter, ApplicationError> {
        let chapter = self
            .chapter_repo
            .delete(command.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id.value()))?;

        sync_chapter_count(
            self.story_repo.as_ref(),
            self.chapter_repo.as_ref(),
            chapter.story_id,
        )
        .await?;

        tracing::info!(
            chapter_id = %chapter.id,
            story_id = %chapter.story_id,
            chapter_number = chapter.chapter_number,
            "Chapter deleted"
        );

        Ok(chapter)
    }
}

// ============================================================================
// ReorderChapters
// ============================================================================

/// ReorderChapters Handler
///
/// 只接受该作品章节 ID 的一个排列，校验在仓储的同一次写入内完成
pub struct ReorderChaptersHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ReorderChaptersHandler {
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            story_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, command: ReorderChapters) -> Result<Vec<Chapter>, ApplicationError> {
        let story_id = command.story_id;

        self.story_repo
            .find_by_id(story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", story_id.value()))?;

        let requested: HashSet<_> = command.ordered_ids.iter().copied().collect();
        if requested.len() != command.ordered_ids.len() {
            return Err(ApplicationError::validation(
                "Chapter order contains duplicate ids",
            ));
        }

        let chapters = self
            .chapter_repo
            .reorder_exact(story_id, &command.ordered_ids)
            .await?
            .ok_or_else(|| {
                ApplicationError::validation(format!(
                    "Chapter order must list every chapter of story {} exactly once",
                    story_id
                ))
            })?;

        tracing::info!(
            story_id = %story_id,
            chapters = chapters.len(),
            "Chapters reordered"
        );

        Ok(chapters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chapter::{ChapterId, ChapterPatch};
    use crate::domain::story::{AuthorRef, NewStory};
    use crate::infrastructure::memory::{
        InMemoryChapterRepository, InMemoryStoryRepository, SimulatedLatency,
    };
    use crate::infrastructure::seed::SeedData;
    use std::time::Duration;

    struct Fixture {
        stories: Arc<InMemoryStoryRepository>,
        chapters: Arc<InMemoryChapterRepository>,
    }

    impl Fixture {
        fn seeded() -> Self {
            let seed = SeedData::embedded().unwrap();
            Self {
                stories: InMemoryStoryRepository::new(seed.stories).arc(),
                chapters: InMemoryChapterRepository::new(seed.chapters).arc(),
            }
        }

        /// 只有章节仓储带延迟
        fn with_chapter_latency(scale: f64) -> Self {
            let seed = SeedData::embedded().unwrap();
            Self {
                stories: InMemoryStoryRepository::new(seed.stories).arc(),
                chapters: InMemoryChapterRepository::new(seed.chapters)
                    .with_latency(SimulatedLatency::new(true, scale))
                    .arc(),
            }
        }

        fn create(&self) -> CreateChapterHandler {
            CreateChapterHandler::new(self.stories.clone(), self.chapters.clone())
        }

        fn delete(&self) -> DeleteChapterHandler {
            DeleteChapterHandler::new(self.stories.clone(), self.chapters.clone())
        }

        fn reorder(&self) -> ReorderChaptersHandler {
            ReorderChaptersHandler::new(self.stories.clone(), self.chapters.clone())
        }

        async fn chapter_count(&self, story_id: u64) -> u32 {
            self.stories
                .find_by_id(StoryId::new(story_id))
                .await
                .unwrap()
                .unwrap()
                .chapter_count
        }

        async fn numbers(&self, story_id: StoryId) -> Vec<(ChapterId, u32)> {
            self.chapters
                .list_by_story(story_id)
                .await
                .unwrap()
                .into_iter()
                .map(|c| (c.id, c.chapter_number))
                .collect()
        }
    }

    fn command(story_id: StoryId, title: &str) -> CreateChapter {
        CreateChapter {
            story_id,
            title: title.to_string(),
            content: "The tide came in twice that night.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_chapter_appends_and_syncs_count() {
        let fixture = Fixture::seeded();

        let chapter = fixture
            .create()
            .handle(command(StoryId::new(1), "  The Far Coast  "))
            .await
            .unwrap();

        assert_eq!(chapter.id, ChapterId::new(14));
        assert_eq!(chapter.chapter_number, 4);
        assert_eq!(chapter.title, "The Far Coast");
        assert_eq!(chapter.word_count, 7);
        assert_eq!(fixture.chapter_count(1).await, 4);
    }

    #[tokio::test]
    async fn test_create_chapter_for_missing_story() {
        let fixture = Fixture::seeded();
        let err = fixture
            .create()
            .handle(command(StoryId::new(999), "Prologue"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(fixture
            .chapters
            .list_by_story(StoryId::new(999))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_chapter_validation() {
        let fixture = Fixture::seeded();

        let err = fixture
            .create()
            .handle(command(StoryId::new(1), " ab "))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let mut short = command(StoryId::new(1), "Prologue");
        short.content = "too short".to_string();
        let err = fixture.create().handle(short).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_story_42_renumber_scenario() {
        let stories = InMemoryStoryRepository::empty().arc();
        let chapters = InMemoryChapterRepository::empty().arc();
        for _ in 0..42 {
            stories
                .create(
                    NewStory {
                        title: "Filler".to_string(),
                        description: "Filler story".to_string(),
                        genre: "Drama".to_string(),
                        cover_image: None,
                    },
                    AuthorRef::new("current-user", "Current User"),
                )
                .await
                .unwrap();
        }
        let fixture = Fixture { stories, chapters };
        let story_id = StoryId::new(42);

        let first = fixture.create().handle(command(story_id, "One")).await.unwrap();
        let second = fixture.create().handle(command(story_id, "Two")).await.unwrap();
        let third = fixture.create().handle(command(story_id, "Three")).await.unwrap();
        assert_eq!(
            fixture.numbers(story_id).await,
            vec![(first.id, 1), (second.id, 2), (third.id, 3)]
        );

        fixture
            .delete()
            .handle(DeleteChapter {
                chapter_id: second.id,
            })
            .await
            .unwrap();

        assert_eq!(
            fixture.numbers(story_id).await,
            vec![(first.id, 1), (third.id, 2)]
        );
        assert_eq!(fixture.chapter_count(42).await, 2);
    }

    #[tokio::test]
    async fn test_delete_missing_chapter() {
        let fixture = Fixture::seeded();
        let err = fixture
            .delete()
            .handle(DeleteChapter {
                chapter_id: ChapterId::new(999),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_chapter_recomputes_word_count() {
        let fixture = Fixture::seeded();
        let handler = UpdateChapterHandler::new(fixture.chapters.clone());

        let chapter = handler
            .handle(UpdateChapter {
                chapter_id: ChapterId::new(4),
                patch: ChapterPatch {
                    title: None,
                    content: Some("Dear stranger, the mailbox was never mine.".to_string()),
                },
            })
            .await
            .unwrap();
        assert_eq!(chapter.word_count, 7);
        assert_eq!(chapter.chapter_number, 1);

        let err = handler
            .handle(UpdateChapter {
                chapter_id: ChapterId::new(999),
                patch: ChapterPatch::default(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_reorder_requires_full_permutation() {
        let fixture = Fixture::seeded();
        let story_id = StoryId::new(1);

        let chapters = fixture
            .reorder()
            .handle(ReorderChapters {
                story_id,
                ordered_ids: vec![ChapterId::new(3), ChapterId::new(1), ChapterId::new(2)],
            })
            .await
            .unwrap();
        let order: Vec<_> = chapters.iter().map(|c| (c.id.value(), c.chapter_number)).collect();
        assert_eq!(order, vec![(3, 1), (1, 2), (2, 3)]);

        // 缺少章节
        let err = fixture
            .reorder()
            .handle(ReorderChapters {
                story_id,
                ordered_ids: vec![ChapterId::new(3), ChapterId::new(1)],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        // 其他作品的章节
        let err = fixture
            .reorder()
            .handle(ReorderChapters {
                story_id,
                ordered_ids: vec![ChapterId::new(3), ChapterId::new(1), ChapterId::new(4)],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        // 重复 ID
        let err = fixture
            .reorder()
            .handle(ReorderChapters {
                story_id,
                ordered_ids: vec![
                    ChapterId::new(3),
                    ChapterId::new(1),
                    ChapterId::new(2),
                    ChapterId::new(2),
                ],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        // 失败的重排不会改变编号
        let order: Vec<_> = fixture
            .numbers(story_id)
            .await
            .into_iter()
            .map(|(id, n)| (id.value(), n))
            .collect();
        assert_eq!(order, vec![(3, 1), (1, 2), (2, 3)]);
    }

    #[tokio::test]
    async fn test_reorder_racing_delete_keeps_numbers_contiguous() {
        // 重排在 200ms 后取得写锁，删除在 150ms 时完成
        let fixture = Fixture::with_chapter_latency(0.5);
        let story_id = StoryId::new(1);
        let reorder = fixture.reorder();
        let delete = fixture.delete();

        let (reordered, deleted) = tokio::join!(
            reorder.handle(ReorderChapters {
                story_id,
                ordered_ids: vec![ChapterId::new(3), ChapterId::new(2), ChapterId::new(1)],
            }),
            delete.handle(DeleteChapter {
                chapter_id: ChapterId::new(2),
            }),
        );

        deleted.unwrap();
        let err = reordered.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        assert_eq!(
            fixture.numbers(story_id).await,
            vec![(ChapterId::new(1), 1), (ChapterId::new(3), 2)]
        );
        assert_eq!(fixture.chapter_count(1).await, 2);
    }

    #[tokio::test]
    async fn test_create_chapter_discarded_when_story_deleted_meanwhile() {
        // 章节在 100ms 后写入，作品在 30ms 时被删除
        let fixture = Fixture::with_chapter_latency(0.2);
        let story_id = StoryId::new(1);
        let create = fixture.create();

        let (created, _) = tokio::join!(create.handle(command(story_id, "Epilogue")), async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            fixture.stories.delete(story_id).await.unwrap().unwrap();
        });

        assert!(created.unwrap_err().is_not_found());
        assert!(fixture
            .chapters
            .find_by_id(ChapterId::new(14))
            .await
            .unwrap()
            .is_none());
        let remaining: Vec<u32> = fixture
            .numbers(story_id)
            .await
            .into_iter()
            .map(|(_, n)| n)
            .collect();
        assert_eq!(remaining, vec![1, 2, 3]);
    }
}
