//! Story Queries

use crate::domain::story::StoryId;

/// 列出所有作品
#[derive(Debug, Clone)]
pub struct ListStories;

/// 获取作品详情
#[derive(Debug, Clone)]
pub struct GetStory {
    pub story_id: StoryId,
}

/// 按作者列出作品
#[derive(Debug, Clone)]
pub struct ListStoriesByAuthor {
    pub author_id: String,
}

/// 按分类列出作品
#[derive(Debug, Clone)]
pub struct ListStoriesByGenre {
    pub genre: String,
}

/// 推荐作品（阅读量最高的已发布作品）
#[derive(Debug, Clone)]
pub struct ListFeaturedStories;

/// 热门作品（最近更新的已发布作品）
#[derive(Debug, Clone)]
pub struct ListTrendingStories;

/// 搜索作品
#[derive(Debug, Clone)]
pub struct SearchStories {
    pub term: String,
}

/// 作者统计
#[derive(Debug, Clone)]
pub struct GetAuthorStats {
    pub author_id: String,
}
