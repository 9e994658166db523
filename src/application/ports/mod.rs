//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod key_value_store;
mod repositories;

pub use key_value_store::{KeyValueError, KeyValueStorePort};
pub use repositories::{
    ChapterRepositoryPort, LibraryRepositoryPort, RepositoryError, StoryRepositoryPort,
    FEATURED_LIMIT, TRENDING_LIMIT,
};
