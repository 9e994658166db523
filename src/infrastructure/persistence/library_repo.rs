//! Key-Value Library Repository
//!
//! 书架叠加层以单个 JSON 数组保存在键值介质的固定键下:
//! `[{"storyId": 1, "status": "want-to-read", "addedAt": "...", "updatedAt": "..."}]`
//!
//! 只读路径上，读取失败或数据损坏都视为空书架（会记录 warn 日志）。
//! 写路径上读取失败会向上返回 `RepositoryError::Storage`，
//! 只有数据损坏才按空书架处理，损坏的数据会在这次写入时被覆盖。
//! 书架清空后删除存储键。

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::{KeyValueStorePort, LibraryRepositoryPort, RepositoryError};
use crate::domain::library::{LibraryEntry, ReadingStatus};
use crate::domain::story::StoryId;

/// 默认存储键
pub const DEFAULT_LIBRARY_KEY: &str = "storyshelf.library";

/// 基于键值介质的书架仓储
pub struct KeyValueLibraryRepository {
    store: Arc<dyn KeyValueStorePort>,
    key: String,
    /// 串行化读-改-写
    write_lock: Mutex<()>,
}

impl KeyValueLibraryRepository {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self::with_key(store, DEFAULT_LIBRARY_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStorePort>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 只读路径使用，读取失败按空书架处理
    async fn load(&self) -> Vec<LibraryEntry> {
        match self.store.get_item(&self.key).await {
            Ok(raw) => self.parse(raw),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Library storage unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    /// 读-改-写路径使用，读取失败直接返回错误
    async fn load_for_write(&self) -> Result<Vec<LibraryEntry>, RepositoryError> {
        let raw = self.store.get_item(&self.key).await?;
        Ok(self.parse(raw))
    }

    fn parse(&self, raw: Option<String>) -> Vec<LibraryEntry> {
        let Some(raw) = raw else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<LibraryEntry>>(&raw) {
            Ok(entries) => dedupe(entries),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Library data corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    async fn save(&self, entries: &[LibraryEntry]) -> Result<(), RepositoryError> {
        if entries.is_empty() {
            self.store.remove_item(&self.key).await?;
            return Ok(());
        }
        let json = serde_json::to_string(entries)?;
        self.store.set_item(&self.key, &json).await?;
        Ok(())
    }
}

/// 同一作品出现多次时只保留最后一条
fn dedupe(entries: Vec<LibraryEntry>) -> Vec<LibraryEntry> {
    let mut result: Vec<LibraryEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        result.retain(|e| e.story_id != entry.story_id);
        result.push(entry);
    }
    result
}

#[async_trait]
impl LibraryRepositoryPort for KeyValueLibraryRepository {
    async fn entries(&self) -> Vec<LibraryEntry> {
        self.load().await
    }

    async fn add(
        &self,
        story_id: StoryId,
        status: ReadingStatus,
    ) -> Result<LibraryEntry, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write().await?;

        entries.retain(|e| e.story_id != story_id);
        let entry = LibraryEntry::new(story_id, status, Utc::now());
        entries.push(entry.clone());
        self.save(&entries).await?;

        Ok(entry)
    }

    async fn remove(&self, story_id: StoryId) -> Result<bool, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write().await?;

        let before = entries.len();
        entries.retain(|e| e.story_id != story_id);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries).await?;
        Ok(true)
    }

    async fn update_status(
        &self,
        story_id: StoryId,
        status: ReadingStatus,
    ) -> Result<Option<LibraryEntry>, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write().await?;

        let Some(entry) = entries.iter_mut().find(|e| e.story_id == story_id) else {
            return Ok(None);
        };
        entry.set_status(status, Utc::now());
        let updated = entry.clone();
        self.save(&entries).await?;

        Ok(Some(updated))
    }

    async fn get_status(&self, story_id: StoryId) -> Option<ReadingStatus> {
        self.load()
            .await
            .into_iter()
            .find(|e| e.story_id == story_id)
            .map(|e| e.status)
    }

    async fn remove_by_status(&self, status: ReadingStatus) -> Result<usize, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write().await?;

        let before = entries.len();
        entries.retain(|e| e.status != status);
        let removed = before - entries.len();
        if removed > 0 {
            self.save(&entries).await?;
        }
        Ok(removed)
    }

    async fn move_status(
        &self,
        from: ReadingStatus,
        to: ReadingStatus,
    ) -> Result<usize, RepositoryError> {
        if from == to {
            return Ok(0);
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write().await?;
        let now = Utc::now();

        let mut moved = 0;
        for entry in entries.iter_mut().filter(|e| e.status == from) {
            entry.set_status(to, now);
            moved += 1;
        }
        if moved > 0 {
            self.save(&entries).await?;
        }
        Ok(moved)
    }
}
