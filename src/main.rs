//! Storyshelf - 连载小说数据服务
//!
//! 启动流程：加载配置、初始化日志、载入种子数据、打开书架数据库，并输出目录概况

use storyshelf::application::{
    GetAuthorStats, GetLibrarySummary, ListFeaturedStories, ListStories,
};
use storyshelf::config::{load_config, print_config};
use storyshelf::domain::library::ReadingStatus;
use storyshelf::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},storyshelf={}", config.log.level, config.log.level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Storyshelf - 连载小说数据服务");
    print_config(&config);

    let state = AppState::bootstrap(&config).await?;

    // 目录概况
    let stories = state.list_stories_handler.handle(ListStories).await?;
    let chapters: usize = stories.iter().map(|s| s.chapter_count as usize).sum();
    tracing::info!(
        stories = stories.len(),
        chapters = chapters,
        "Catalog loaded"
    );

    let featured = state
        .list_featured_handler
        .handle(ListFeaturedStories)
        .await?;
    for (rank, story) in featured.iter().enumerate() {
        tracing::info!(
            rank = rank + 1,
            story_id = %story.id,
            title = %story.title,
            views = story.views,
            "Featured"
        );
    }

    let stats = state
        .get_author_stats_handler
        .handle(GetAuthorStats {
            author_id: state.author.id.clone(),
        })
        .await?;
    tracing::info!(
        author = %state.author.name,
        published = stats.published,
        drafts = stats.drafts,
        total_views = stats.total_views,
        "My stories"
    );

    let summary = state
        .get_library_summary_handler
        .handle(GetLibrarySummary)
        .await?;
    for status in ReadingStatus::ALL {
        tracing::info!(
            section = status.label(),
            count = summary.count(status),
            "Library"
        );
    }
    tracing::info!(total = summary.total, "Library loaded");

    Ok(())
}
