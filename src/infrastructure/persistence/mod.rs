//! Persistence Layer - 数据持久化
//!
//! Sled 键值存储与书架叠加层

mod library_repo;
pub mod sled;

pub use self::sled::SledKeyValueStore;
pub use library_repo::{KeyValueLibraryRepository, DEFAULT_LIBRARY_KEY};
