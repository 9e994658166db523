//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod chapter_handlers;
mod library_handlers;
mod story_handlers;

pub use chapter_handlers::*;
pub use library_handlers::*;
pub use story_handlers::*;
