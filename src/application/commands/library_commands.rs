//! Library Commands
//!
//! 状态字段保留调用方传入的原始字符串，在处理器中校验

use crate::domain::story::StoryId;

/// 加入书架命令，未指定状态时为 want-to-read
#[derive(Debug, Clone)]
pub struct AddToLibrary {
    pub story_id: StoryId,
    pub status: Option<String>,
}

/// 移出书架命令
#[derive(Debug, Clone)]
pub struct RemoveFromLibrary {
    pub story_id: StoryId,
}

/// 修改阅读状态命令
#[derive(Debug, Clone)]
pub struct UpdateLibraryStatus {
    pub story_id: StoryId,
    pub status: String,
}

/// 清空书架分区命令
#[derive(Debug, Clone)]
pub struct ClearLibrarySection {
    pub status: String,
}

/// 整个分区移动到另一状态
#[derive(Debug, Clone)]
pub struct MoveLibrarySection {
    pub from: String,
    pub to: String,
}
