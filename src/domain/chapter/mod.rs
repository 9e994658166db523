//! Chapter Context - 章节限界上下文
//!
//! 职责:
//! - 章节实体与字数统计
//! - 单个作品内章节编号的连续性（1..=N）

mod entities;
mod value_objects;

pub use entities::{renumber, Chapter, ChapterPatch, NewChapter};
pub use value_objects::{count_words, ChapterId};
