//! Library Queries

use crate::domain::story::StoryId;

/// 列出书架，可按状态筛选
#[derive(Debug, Clone, Default)]
pub struct ListLibrary {
    pub status: Option<String>,
}

/// 获取作品在书架中的状态
#[derive(Debug, Clone)]
pub struct GetLibraryStatus {
    pub story_id: StoryId,
}

/// 书架各分区计数
#[derive(Debug, Clone)]
pub struct GetLibrarySummary;
