//! Library Context - 读者书架限界上下文
//!
//! 以作品 ID 为键的阅读状态叠加层，与作品归属/作者解耦

mod entities;
mod value_objects;

pub use entities::LibraryEntry;
pub use value_objects::ReadingStatus;
