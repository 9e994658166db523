//! Library Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ReadingStatus;
use crate::domain::story::StoryId;

/// 书架条目
///
/// 不变量: 每个作品至多一个条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub story_id: StoryId,
    pub status: ReadingStatus,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LibraryEntry {
    pub fn new(story_id: StoryId, status: ReadingStatus, now: DateTime<Utc>) -> Self {
        Self {
            story_id,
            status,
            added_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: ReadingStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}
