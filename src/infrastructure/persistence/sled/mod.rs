//! Sled 嵌入式键值存储

mod key_value_store;

pub use key_value_store::{SledKeyValueStore, SledStoreConfig};
