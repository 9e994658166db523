//! Memory Layer - In-Memory State Management
//!
//! 作品、章节仓储的内存实现（以种子数据启动），以及内存键值介质

mod chapter_repo;
mod key_value_store;
mod latency;
mod story_repo;

pub use chapter_repo::InMemoryChapterRepository;
pub use key_value_store::InMemoryKeyValueStore;
pub use latency::SimulatedLatency;
pub use story_repo::InMemoryStoryRepository;
