//! Story Context - Value Objects

use serde::{Deserialize, Serialize};

/// 作品唯一标识（正整数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(u64);

impl StoryId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for StoryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 作品发布状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    /// 草稿
    #[default]
    Draft,
    /// 已发布
    Published,
    /// 已归档
    Archived,
}

impl StoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStatus::Draft => "draft",
            StoryStatus::Published => "published",
            StoryStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(StoryStatus::Draft),
            "published" => Some(StoryStatus::Published),
            "archived" => Some(StoryStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 作品标题
///
/// 首尾空白会被去除，去除后不可为空且不超过 200 字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub const MAX_CHARS: usize = 200;

    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            return Err("标题不能为空");
        }
        if title.chars().count() > Self::MAX_CHARS {
            return Err("标题长度不能超过200字符");
        }
        Ok(Self(title.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        for status in [StoryStatus::Draft, StoryStatus::Published, StoryStatus::Archived] {
            assert_eq!(StoryStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(StoryStatus::from_str("Published"), None);
    }

    #[test]
    fn test_title_is_trimmed() {
        let title = Title::new("  The Long Night  ").unwrap();
        assert_eq!(title.as_str(), "The Long Night");
    }

    #[test]
    fn test_title_rejects_blank_and_long() {
        assert!(Title::new("   ").is_err());
        assert!(Title::new("x".repeat(201)).is_err());
        assert!(Title::new("x".repeat(200)).is_ok());
    }
}
