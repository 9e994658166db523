//! In-Memory Chapter Repository
//!
//! 全局章节集合按插入顺序存放（新章节在头部），按作品读取时总是按章节编号排序。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::SimulatedLatency;
use crate::application::ports::{ChapterRepositoryPort, RepositoryError};
use crate::domain::chapter::{renumber, Chapter, ChapterId, ChapterPatch, NewChapter};
use crate::domain::story::StoryId;
use crate::domain::IdAllocator;

/// 各操作的模拟延迟（毫秒）
mod delay {
    pub const BY_STORY: u64 = 250;
    pub const GET: u64 = 200;
    pub const CREATE: u64 = 500;
    pub const UPDATE: u64 = 400;
    pub const DELETE: u64 = 300;
    pub const REORDER: u64 = 400;
    pub const ADJACENT: u64 = 200;
}

struct ChapterState {
    chapters: Vec<Chapter>,
    ids: IdAllocator,
}

impl ChapterState {
    fn sorted_for_story(&self, story_id: StoryId) -> Vec<Chapter> {
        let mut chapters: Vec<Chapter> = self
            .chapters
            .iter()
            .filter(|c| c.story_id == story_id)
            .cloned()
            .collect();
        chapters.sort_by_key(|c| c.chapter_number);
        chapters
    }

    fn next_number(&self, story_id: StoryId) -> u32 {
        self.chapters
            .iter()
            .filter(|c| c.story_id == story_id)
            .map(|c| c.chapter_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn is_permutation(&self, story_id: StoryId, ordered_ids: &[ChapterId]) -> bool {
        let current: HashSet<ChapterId> = self
            .chapters
            .iter()
            .filter(|c| c.story_id == story_id)
            .map(|c| c.id)
            .collect();
        let requested: HashSet<ChapterId> = ordered_ids.iter().copied().collect();
        requested.len() == ordered_ids.len() && requested == current
    }

    /// 编号 = 在列表中的位置 + 1，跳过不属于该作品的 ID
    fn assign_positions(
        &mut self,
        story_id: StoryId,
        ordered_ids: &[ChapterId],
        now: DateTime<Utc>,
    ) {
        for (position, chapter_id) in ordered_ids.iter().enumerate() {
            match self
                .chapters
                .iter_mut()
                .find(|c| c.id == *chapter_id && c.story_id == story_id)
            {
                Some(chapter) => {
                    chapter.chapter_number = position as u32 + 1;
                    chapter.updated_at = now;
                }
                None => {
                    tracing::warn!(
                        story_id = %story_id,
                        chapter_id = %chapter_id,
                        "Reorder skipped unknown chapter"
                    );
                }
            }
        }
    }
}

/// 内存章节仓储
pub struct InMemoryChapterRepository {
    state: RwLock<ChapterState>,
    latency: SimulatedLatency,
}

impl InMemoryChapterRepository {
    /// 以种子数据创建仓储
    ///
    /// 种子章节的编号会按作品归一化为 1..=N
    pub fn new(mut chapters: Vec<Chapter>) -> Self {
        let mut story_ids: Vec<StoryId> = chapters.iter().map(|c| c.story_id).collect();
        story_ids.sort();
        story_ids.dedup();

        for story_id in story_ids {
            let changed = renumber(chapters.iter_mut().filter(|c| c.story_id == story_id));
            if changed > 0 {
                tracing::warn!(
                    story_id = %story_id,
                    changed = changed,
                    "Seed chapters were not numbered 1..N, renumbered"
                );
            }
        }

        let ids = IdAllocator::seeded(chapters.iter().map(|c| c.id.value()));
        Self {
            state: RwLock::new(ChapterState { chapters, ids }),
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

    async fn adjacent(
        &self,
        story_id: StoryId,
        current_number: u32,
        forward: bool,
    ) -> Option<Chapter> {
        self.latency.pause(delay::ADJACENT).await;
        let chapters = self.state.read().await.sorted_for_story(story_id);
        let index = chapters
            .iter()
            .position(|c| c.chapter_number == current_number)?;

        let target = if forward {
            index.checked_add(1)?
        } else {
            index.checked_sub(1)?
        };
        chapters.into_iter().nth(target)
    }
}

impl Default for InMemoryChapterRepository {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl ChapterRepositoryPort for InMemoryChapterRepository {
    async fn list_by_story(&self, story_id: StoryId) -> Result<Vec<Chapter>, RepositoryError> {
        self.latency.pause(delay::BY_STORY).await;
        Ok(self.state.read().await.sorted_for_story(story_id))
    }

    async fn find_by_id(&self, id: ChapterId) -> Result<Option<Chapter>, RepositoryError> {
        self.latency.pause(delay::GET).await;
        let state = self.state.read().await;
        Ok(state.chapters.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_number(
        &self,
        story_id: StoryId,
        chapter_number: u32,
    ) -> Result<Option<Chapter>, RepositoryError> {
        self.latency.pause(delay::GET).await;
        let state = self.state.read().await;
        Ok(state
            .chapters
            .iter()
            .find(|c| c.story_id == story_id && c.chapter_number == chapter_number)
            .cloned())
    }

    async fn create(&self, data: NewChapter) -> Result<Chapter, RepositoryError> {
        self.latency.pause(delay::CREATE).await;
        let mut state = self.state.write().await;

        let id = ChapterId::new(state.ids.allocate());
        let number = state.next_number(data.story_id);
        let chapter = Chapter::new(id, number, data, Utc::now());
        state.chapters.insert(0, chapter.clone());

        tracing::debug!(
            chapter_id = %chapter.id,
            story_id = %chapter.story_id,
            chapter_number = chapter.chapter_number,
            "Chapter appended"
        );

        Ok(chapter)
    }

    async fn update(
        &self,
        id: ChapterId,
        patch: ChapterPatch,
    ) -> Result<Option<Chapter>, RepositoryError> {
        self.latency.pause(delay::UPDATE).await;
        let mut state = self.state.write().await;

        Ok(state.chapters.iter_mut().find(|c| c.id == id).map(|chapter| {
            chapter.apply(patch, Utc::now());
            chapter.clone()
        }))
    }

    async fn delete(&self, id: ChapterId) -> Result<Option<Chapter>, RepositoryError> {
        self.latency.pause(delay::DELETE).await;
        let mut state = self.state.write().await;

        let Some(index) = state.chapters.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let removed = state.chapters.remove(index);

        // 关闭编号空洞
        let story_id = removed.story_id;
        let changed = renumber(
            state
                .chapters
                .iter_mut()
                .filter(|c| c.story_id == story_id),
        );

        tracing::debug!(
            chapter_id = %removed.id,
            story_id = %story_id,
            renumbered = changed,
            "Chapter removed"
        );

        Ok(Some(removed))
    }

    async fn reorder(
        &self,
        story_id: StoryId,
        ordered_ids: &[ChapterId],
    ) -> Result<Vec<Chapter>, RepositoryError> {
        self.latency.pause(delay::REORDER).await;
        let mut state = self.state.write().await;
        state.assign_positions(story_id, ordered_ids, Utc::now());
        Ok(state.sorted_for_story(story_id))
    }

    async fn reorder_exact(
        &self,
        story_id: StoryId,
        ordered_ids: &[ChapterId],
    ) -> Result<Option<Vec<Chapter>>, RepositoryError> {
        self.latency.pause(delay::REORDER).await;
        let mut state = self.state.write().await;

        if !state.is_permutation(story_id, ordered_ids) {
            tracing::debug!(
                story_id = %story_id,
                requested = ordered_ids.len(),
                "Chapter order is not a permutation, nothing changed"
            );
            return Ok(None);
        }
        state.assign_positions(story_id, ordered_ids, Utc::now());
        Ok(Some(state.sorted_for_story(story_id)))
    }

    async fn next(
        &self,
        story_id: StoryId,
        current_number: u32,
    ) -> Result<Option<Chapter>, RepositoryError> {
        Ok(self.adjacent(story_id, current_number, true).await)
    }

    async fn previous(
        &self,
        story_id: StoryId,
        current_number: u32,
    ) -> Result<Option<Chapter>, RepositoryError> {
        Ok(self.adjacent(story_id, current_number, false).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_chapter(story_id: u64, title: &str) -> NewChapter {
        NewChapter {
            story_id: StoryId::new(story_id),
            title: title.to_string(),
            content: format!("{} begins here and keeps going", title),
        }
    }

    fn numbers(chapters: &[Chapter]) -> Vec<u32> {
        chapters.iter().map(|c| c.chapter_number).collect()
    }

    async fn assert_contiguous(repo: &InMemoryChapterRepository, story_id: u64) {
        let chapters = repo.list_by_story(StoryId::new(story_id)).await.unwrap();
        let expected: Vec<u32> = (1..=chapters.len() as u32).collect();
        assert_eq!(numbers(&chapters), expected);
    }

    #[tokio::test]
    async fn test_create_appends_numbers_per_story() {
        let repo = InMemoryChapterRepository::empty();
        let a1 = repo.create(new_chapter(1, "A1")).await.unwrap();
        let b1 = repo.create(new_chapter(2, "B1")).await.unwrap();
        let a2 = repo.create(new_chapter(1, "A2")).await.unwrap();

        assert_eq!(a1.chapter_number, 1);
        assert_eq!(b1.chapter_number, 1);
        assert_eq!(a2.chapter_number, 2);
        assert_eq!(a2.word_count, 6);
        assert!(a1.id < b1.id && b1.id < a2.id);
    }

    #[tokio::test]
    async fn test_delete_middle_chapter_renumbers() {
        let repo = InMemoryChapterRepository::empty();
        let first = repo.create(new_chapter(42, "One")).await.unwrap();
        let second = repo.create(new_chapter(42, "Two")).await.unwrap();
        let third = repo.create(new_chapter(42, "Three")).await.unwrap();

        let removed = repo.delete(second.id).await.unwrap().unwrap();
        assert_eq!(removed.chapter_number, 2);

        let remaining = repo.list_by_story(StoryId::new(42)).await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!((remaining[0].id, remaining[0].chapter_number), (first.id, 1));
        assert_eq!((remaining[1].id, remaining[1].chapter_number), (third.id, 2));
    }

    #[tokio::test]
    async fn test_contiguity_survives_mixed_operations() {
        let repo = InMemoryChapterRepository::empty();
        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(repo.create(new_chapter(7, &format!("C{}", i))).await.unwrap().id);
            assert_contiguous(&repo, 7).await;
        }

        for id in [ids[5], ids[0], ids[3]] {
            repo.delete(id).await.unwrap();
            assert_contiguous(&repo, 7).await;
        }

        repo.create(new_chapter(7, "Late")).await.unwrap();
        assert_contiguous(&repo, 7).await;
        assert_eq!(repo.count_by_story(StoryId::new(7)).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_delete_only_renumbers_same_story() {
        let repo = InMemoryChapterRepository::empty();
        let a1 = repo.create(new_chapter(1, "A1")).await.unwrap();
        repo.create(new_chapter(2, "B1")).await.unwrap();
        repo.create(new_chapter(2, "B2")).await.unwrap();

        repo.delete(a1.id).await.unwrap();
        let other = repo.list_by_story(StoryId::new(2)).await.unwrap();
        assert_eq!(numbers(&other), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_delete_missing_chapter() {
        let repo = InMemoryChapterRepository::empty();
        assert!(repo.delete(ChapterId::new(5)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_never_reused() {
        let repo = InMemoryChapterRepository::empty();
        let a = repo.create(new_chapter(1, "A")).await.unwrap();
        let b = repo.create(new_chapter(1, "B")).await.unwrap();
        repo.delete(b.id).await.unwrap();
        let c = repo.create(new_chapter(1, "C")).await.unwrap();
        assert_eq!((a.id.value(), b.id.value(), c.id.value()), (1, 2, 3));
        assert_eq!(c.chapter_number, 2);
    }

    #[tokio::test]
    async fn test_update_recomputes_word_count() {
        let repo = InMemoryChapterRepository::empty();
        let chapter = repo.create(new_chapter(1, "Opening")).await.unwrap();

        let updated = repo
            .update(
                chapter.id,
                ChapterPatch {
                    content: Some("just three words".to_string()),
                    ..ChapterPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.word_count, 3);
        assert_eq!(updated.title, "Opening");
        assert_eq!(updated.chapter_number, chapter.chapter_number);
        assert!(repo
            .update(ChapterId::new(99), ChapterPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_reorder_assigns_positions_and_skips_unknown() {
        let repo = InMemoryChapterRepository::empty();
        let c1 = repo.create(new_chapter(3, "C1")).await.unwrap();
        let c2 = repo.create(new_chapter(3, "C2")).await.unwrap();
        let c3 = repo.create(new_chapter(3, "C3")).await.unwrap();

        let reordered = repo
            .reorder(StoryId::new(3), &[c3.id, ChapterId::new(999), c1.id, c2.id])
            .await
            .unwrap();

        let order: Vec<(ChapterId, u32)> = reordered
            .iter()
            .map(|c| (c.id, c.chapter_number))
            .collect();
        assert_eq!(order, vec![(c3.id, 1), (c1.id, 3), (c2.id, 4)]);
    }

    #[tokio::test]
    async fn test_reorder_ignores_chapters_of_other_story() {
        let repo = InMemoryChapterRepository::empty();
        let mine = repo.create(new_chapter(1, "Mine")).await.unwrap();
        let theirs = repo.create(new_chapter(2, "Theirs")).await.unwrap();

        repo.reorder(StoryId::new(1), &[theirs.id, mine.id]).await.unwrap();

        let theirs_after = repo.find_by_id(theirs.id).await.unwrap().unwrap();
        assert_eq!(theirs_after.chapter_number, 1);
        let mine_after = repo.find_by_id(mine.id).await.unwrap().unwrap();
        assert_eq!(mine_after.chapter_number, 2);
    }

    #[tokio::test]
    async fn test_reorder_exact_rejects_anything_but_a_permutation() {
        let repo = InMemoryChapterRepository::empty();
        let c1 = repo.create(new_chapter(6, "C1")).await.unwrap();
        let c2 = repo.create(new_chapter(6, "C2")).await.unwrap();
        let other = repo.create(new_chapter(8, "Other")).await.unwrap();
        let story = StoryId::new(6);

        for ids in [
            vec![c2.id],
            vec![c2.id, c1.id, c1.id],
            vec![c2.id, other.id],
            vec![c2.id, c1.id, ChapterId::new(999)],
        ] {
            assert!(repo.reorder_exact(story, &ids).await.unwrap().is_none());
            let unchanged = repo.list_by_story(story).await.unwrap();
            assert_eq!(unchanged[0].id, c1.id);
            assert_contiguous(&repo, 6).await;
        }

        let reordered = repo
            .reorder_exact(story, &[c2.id, c1.id])
            .await
            .unwrap()
            .unwrap();
        let order: Vec<(ChapterId, u32)> = reordered
            .iter()
            .map(|c| (c.id, c.chapter_number))
            .collect();
        assert_eq!(order, vec![(c2.id, 1), (c1.id, 2)]);
        assert_eq!(repo.find_by_id(other.id).await.unwrap().unwrap().chapter_number, 1);
    }

    #[tokio::test]
    async fn test_next_and_previous() {
        let repo = InMemoryChapterRepository::empty();
        let c1 = repo.create(new_chapter(9, "C1")).await.unwrap();
        let c2 = repo.create(new_chapter(9, "C2")).await.unwrap();
        let story = StoryId::new(9);

        assert_eq!(repo.next(story, 1).await.unwrap().unwrap().id, c2.id);
        assert!(repo.next(story, 2).await.unwrap().is_none());
        assert_eq!(repo.previous(story, 2).await.unwrap().unwrap().id, c1.id);
        assert!(repo.previous(story, 1).await.unwrap().is_none());
        assert!(repo.next(story, 7).await.unwrap().is_none());
        assert!(repo.next(StoryId::new(10), 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_number() {
        let repo = InMemoryChapterRepository::empty();
        repo.create(new_chapter(4, "First")).await.unwrap();
        let second = repo.create(new_chapter(4, "Second")).await.unwrap();

        let found = repo.find_by_number(StoryId::new(4), 2).await.unwrap().unwrap();
        assert_eq!(found.id, second.id);
        assert!(repo.find_by_number(StoryId::new(4), 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_numbers_are_normalised() {
        let now = Utc::now();
        let seeded = vec![
            Chapter::new(ChapterId::new(1), 4, new_chapter(5, "Late"), now),
            Chapter::new(ChapterId::new(2), 2, new_chapter(5, "Early"), now),
        ];
        let repo = InMemoryChapterRepository::new(seeded);

        let chapters = repo.list_by_story(StoryId::new(5)).await.unwrap();
        assert_eq!(numbers(&chapters), vec![1, 2]);
        assert_eq!(chapters[0].title, "Early");

        let created = repo.create(new_chapter(5, "Next")).await.unwrap();
        assert_eq!(created.id.value(), 3);
        assert_eq!(created.chapter_number, 3);
    }
}
