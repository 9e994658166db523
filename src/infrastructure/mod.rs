//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod memory;
pub mod persistence;
pub mod seed;
pub mod state;

pub use memory::{InMemoryChapterRepository, InMemoryStoryRepository, SimulatedLatency};
pub use persistence::{KeyValueLibraryRepository, SledKeyValueStore};
pub use state::{AppState, BootstrapError};
