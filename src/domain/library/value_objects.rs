//! Library Context - Value Objects

use serde::{Deserialize, Serialize};

/// 阅读状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    /// 想读
    #[default]
    WantToRead,
    /// 在读
    CurrentlyReading,
    /// 读完
    Completed,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::WantToRead,
        ReadingStatus::CurrentlyReading,
        ReadingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "want-to-read",
            ReadingStatus::CurrentlyReading => "currently-reading",
            ReadingStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "want-to-read" => Some(ReadingStatus::WantToRead),
            "currently-reading" => Some(ReadingStatus::CurrentlyReading),
            "completed" => Some(ReadingStatus::Completed),
            _ => None,
        }
    }

    /// 书架分区的显示名称
    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "Want to Read",
            ReadingStatus::CurrentlyReading => "Currently Reading",
            ReadingStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
