//! Story Context - 作品限界上下文
//!
//! 职责:
//! - 作品聚合与部分更新（merge 语义）
//! - 发布状态
//! - 作者维度的统计

mod aggregate;
mod value_objects;

pub use aggregate::{AuthorRef, NewStory, Story, StoryPatch};
pub use value_objects::{StoryId, StoryStatus, Title};
