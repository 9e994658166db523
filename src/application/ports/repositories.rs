//! Repository Ports - 出站端口
//!
//! 定义作品、章节、书架数据的抽象接口
//! 具体实现在 infrastructure 层（内存集合 / 键值存储）
//!
//! 所有方法返回拥有所有权的副本，调用方无法绕过接口修改内部状态

use async_trait::async_trait;
use thiserror::Error;

use super::KeyValueError;
use crate::domain::chapter::{Chapter, ChapterId, ChapterPatch, NewChapter};
use crate::domain::library::{LibraryEntry, ReadingStatus};
use crate::domain::story::{AuthorRef, NewStory, Story, StoryId, StoryPatch};

/// 推荐作品列表上限
pub const FEATURED_LIMIT: usize = 8;

/// 热门作品列表上限
pub const TRENDING_LIMIT: usize = 12;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<KeyValueError> for RepositoryError {
    fn from(err: KeyValueError) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

// ============================================================================
// Story Repository
// ============================================================================

/// Story Repository Port
#[async_trait]
pub trait StoryRepositoryPort: Send + Sync {
    /// 获取所有作品（插入顺序）
    async fn list(&self) -> Result<Vec<Story>, RepositoryError>;

    /// 根据 ID 查找作品
    async fn find_by_id(&self, id: StoryId) -> Result<Option<Story>, RepositoryError>;

    /// 按作者筛选
    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Story>, RepositoryError>;

    /// 按分类筛选（忽略大小写的精确匹配）
    async fn list_by_genre(&self, genre: &str) -> Result<Vec<Story>, RepositoryError>;

    /// 已发布作品按阅读量降序，最多 FEATURED_LIMIT 条
    async fn list_featured(&self) -> Result<Vec<Story>, RepositoryError>;

    /// 已发布作品按更新时间降序，最多 TRENDING_LIMIT 条
    async fn list_trending(&self) -> Result<Vec<Story>, RepositoryError>;

    /// 标题、简介、作者名、分类的子串搜索（忽略大小写）
    async fn search(&self, term: &str) -> Result<Vec<Story>, RepositoryError>;

    /// 创建草稿作品并插入到集合头部
    async fn create(&self, data: NewStory, author: AuthorRef) -> Result<Story, RepositoryError>;

    /// 合并部分更新，作品不存在时返回 None
    async fn update(&self, id: StoryId, patch: StoryPatch)
        -> Result<Option<Story>, RepositoryError>;

    /// 删除作品并返回被删除的记录
    async fn delete(&self, id: StoryId) -> Result<Option<Story>, RepositoryError>;

    /// 阅读量 +1 并返回新值；作品不存在时返回 0，不报错
    async fn increment_views(&self, id: StoryId) -> Result<u64, RepositoryError>;
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// Chapter Repository Port
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 获取作品的所有章节，按章节编号升序
    async fn list_by_story(&self, story_id: StoryId) -> Result<Vec<Chapter>, RepositoryError>;

    /// 根据 ID 查找章节
    async fn find_by_id(&self, id: ChapterId) -> Result<Option<Chapter>, RepositoryError>;

    /// 根据作品 + 章节编号查找章节
    async fn find_by_number(
        &self,
        story_id: StoryId,
        chapter_number: u32,
    ) -> Result<Option<Chapter>, RepositoryError>;

    /// 作品的章节数
    async fn count_by_story(&self, story_id: StoryId) -> Result<usize, RepositoryError> {
        Ok(self.list_by_story(story_id).await?.len())
    }

    /// 创建章节，编号追加到作品末尾
    async fn create(&self, data: NewChapter) -> Result<Chapter, RepositoryError>;

    /// 合并部分更新，章节不存在时返回 None
    async fn update(
        &self,
        id: ChapterId,
        patch: ChapterPatch,
    ) -> Result<Option<Chapter>, RepositoryError>;

    /// 删除章节并对同一作品的剩余章节重新编号
    async fn delete(&self, id: ChapterId) -> Result<Option<Chapter>, RepositoryError>;

    /// 按给定顺序重新编号，未知 ID 被跳过
    async fn reorder(
        &self,
        story_id: StoryId,
        ordered_ids: &[ChapterId],
    ) -> Result<Vec<Chapter>, RepositoryError>;

    /// 严格重排：`ordered_ids` 必须恰好是作品当前章节 ID 的一个排列
    ///
    /// 校验与重新编号在同一次写入内完成；不是排列时不做任何修改并返回 None
    async fn reorder_exact(
        &self,
        story_id: StoryId,
        ordered_ids: &[ChapterId],
    ) -> Result<Option<Vec<Chapter>>, RepositoryError>;

    /// 下一章，已是最后一章时返回 None
    async fn next(
        &self,
        story_id: StoryId,
        current_number: u32,
    ) -> Result<Option<Chapter>, RepositoryError>;

    /// 上一章，已是第一章时返回 None
    async fn previous(
        &self,
        story_id: StoryId,
        current_number: u32,
    ) -> Result<Option<Chapter>, RepositoryError>;
}

// ============================================================================
// Library Repository
// ============================================================================

/// Library Repository Port
///
/// 读取失败（介质不可用、数据损坏）一律视为空书架，不向调用方报错
#[async_trait]
pub trait LibraryRepositoryPort: Send + Sync {
    /// 获取全部书架条目（插入顺序）
    async fn entries(&self) -> Vec<LibraryEntry>;

    /// 加入书架，替换该作品已有的条目
    async fn add(
        &self,
        story_id: StoryId,
        status: ReadingStatus,
    ) -> Result<LibraryEntry, RepositoryError>;

    /// 移出书架，返回是否确实删除了条目
    async fn remove(&self, story_id: StoryId) -> Result<bool, RepositoryError>;

    /// 修改阅读状态，条目不存在时返回 None
    async fn update_status(
        &self,
        story_id: StoryId,
        status: ReadingStatus,
    ) -> Result<Option<LibraryEntry>, RepositoryError>;

    /// 获取阅读状态
    async fn get_status(&self, story_id: StoryId) -> Option<ReadingStatus>;

    /// 删除某一状态下的全部条目，返回删除数量
    async fn remove_by_status(&self, status: ReadingStatus) -> Result<usize, RepositoryError>;

    /// 将某一状态下的全部条目移动到另一状态，返回移动数量
    async fn move_status(
        &self,
        from: ReadingStatus,
        to: ReadingStatus,
    ) -> Result<usize, RepositoryError>;
}
