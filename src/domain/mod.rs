//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Story Context: 作品管理
//! - Chapter Context: 章节管理（编号连续性）
//! - Library Context: 读者书架（阅读状态）

pub mod chapter;
pub mod library;
pub mod story;

// 共享的 ID 分配器
mod id_allocator;

pub use id_allocator::IdAllocator;
