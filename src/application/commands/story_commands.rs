//! Story Commands

use crate::domain::story::{StoryId, StoryPatch};

/// 创建作品命令（作者为当前用户）
#[derive(Debug, Clone)]
pub struct CreateStory {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub cover_image: Option<String>,
}

/// 更新作品命令（部分更新）
#[derive(Debug, Clone)]
pub struct UpdateStory {
    pub story_id: StoryId,
    pub patch: StoryPatch,
}

/// 删除作品命令
#[derive(Debug, Clone)]
pub struct DeleteStory {
    pub story_id: StoryId,
}

/// 发布作品命令
#[derive(Debug, Clone)]
pub struct PublishStory {
    pub story_id: StoryId,
}

/// 撤回为草稿命令
#[derive(Debug, Clone)]
pub struct UnpublishStory {
    pub story_id: StoryId,
}

/// 归档作品命令
#[derive(Debug, Clone)]
pub struct ArchiveStory {
    pub story_id: StoryId,
}

/// 阅读量 +1 命令
#[derive(Debug, Clone)]
pub struct IncrementViews {
    pub story_id: StoryId,
}
