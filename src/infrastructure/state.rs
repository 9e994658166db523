//! Application State
//!
//! 启动时构建一次的服务容器，持有所有端口与 Command/Query Handlers。
//! 调用方通过引用传递，测试各自构建独立实例。

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::application::{
    // Command handlers
    AddToLibraryHandler, ArchiveStoryHandler, ClearLibrarySectionHandler, CreateChapterHandler,
    CreateStoryHandler, DeleteChapterHandler, DeleteStoryHandler, IncrementViewsHandler,
    MoveLibrarySectionHandler, PublishStoryHandler, RemoveFromLibraryHandler,
    ReorderChaptersHandler, UnpublishStoryHandler, UpdateChapterHandler,
    UpdateLibraryStatusHandler, UpdateStoryHandler,
    // Query handlers
    GetAdjacentChapterHandler, GetAuthorStatsHandler, GetChapterByNumberHandler,
    GetChapterHandler, GetLibraryStatusHandler, GetLibrarySummaryHandler, GetStoryHandler,
    ListChaptersHandler, ListFeaturedStoriesHandler, ListLibraryHandler,
    ListStoriesByAuthorHandler, ListStoriesByGenreHandler, ListStoriesHandler,
    ListTrendingStoriesHandler, SearchStoriesHandler,
    // Ports
    ChapterRepositoryPort, KeyValueError, KeyValueStorePort, LibraryRepositoryPort,
    StoryRepositoryPort,
};
use crate::config::AppConfig;
use crate::domain::story::AuthorRef;
use crate::infrastructure::memory::{
    InMemoryChapterRepository, InMemoryKeyValueStore, InMemoryStoryRepository, SimulatedLatency,
};
use crate::infrastructure::persistence::{KeyValueLibraryRepository, SledKeyValueStore};
use crate::infrastructure::seed::{load_seed, SeedData, SeedError};

/// 启动错误
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Seed data error: {0}")]
    Seed(#[from] SeedError),

    #[error("Library storage error: {0}")]
    Storage(#[from] KeyValueError),

    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: String, message: String },
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub story_repo: Arc<dyn StoryRepositoryPort>,
    pub chapter_repo: Arc<dyn ChapterRepositoryPort>,
    pub library_repo: Arc<dyn LibraryRepositoryPort>,
    pub author: AuthorRef,

    // ========== Command Handlers ==========
    pub create_story_handler: CreateStoryHandler,
    pub update_story_handler: UpdateStoryHandler,
    pub delete_story_handler: DeleteStoryHandler,
    pub publish_story_handler: PublishStoryHandler,
    pub unpublish_story_handler: UnpublishStoryHandler,
    pub archive_story_handler: ArchiveStoryHandler,
    pub increment_views_handler: IncrementViewsHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub reorder_chapters_handler: ReorderChaptersHandler,
    pub add_to_library_handler: AddToLibraryHandler,
    pub remove_from_library_handler: RemoveFromLibraryHandler,
    pub update_library_status_handler: UpdateLibraryStatusHandler,
    pub clear_library_section_handler: ClearLibrarySectionHandler,
    pub move_library_section_handler: MoveLibrarySectionHandler,

    // ========== Query Handlers ==========
    pub list_stories_handler: ListStoriesHandler,
    pub get_story_handler: GetStoryHandler,
    pub list_stories_by_author_handler: ListStoriesByAuthorHandler,
    pub list_stories_by_genre_handler: ListStoriesByGenreHandler,
    pub list_featured_handler: ListFeaturedStoriesHandler,
    pub list_trending_handler: ListTrendingStoriesHandler,
    pub search_stories_handler: SearchStoriesHandler,
    pub get_author_stats_handler: GetAuthorStatsHandler,
    pub list_chapters_handler: ListChaptersHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub get_chapter_by_number_handler: GetChapterByNumberHandler,
    pub get_adjacent_chapter_handler: GetAdjacentChapterHandler,
    pub list_library_handler: ListLibraryHandler,
    pub get_library_status_handler: GetLibraryStatusHandler,
    pub get_library_summary_handler: GetLibrarySummaryHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        library_repo: Arc<dyn LibraryRepositoryPort>,
        author: AuthorRef,
    ) -> Self {
        Self {
            // Command handlers
            create_story_handler: CreateStoryHandler::new(story_repo.clone(), author.clone()),
            update_story_handler: UpdateStoryHandler::new(story_repo.clone()),
            delete_story_handler: DeleteStoryHandler::new(story_repo.clone()),
            publish_story_handler: PublishStoryHandler::new(story_repo.clone()),
            unpublish_story_handler: UnpublishStoryHandler::new(story_repo.clone()),
            archive_story_handler: ArchiveStoryHandler::new(story_repo.clone()),
            increment_views_handler: IncrementViewsHandler::new(story_repo.clone()),
            create_chapter_handler: CreateChapterHandler::new(
                story_repo.clone(),
                chapter_repo.clone(),
            ),
            update_chapter_handler: UpdateChapterHandler::new(chapter_repo.clone()),
            delete_chapter_handler: DeleteChapterHandler::new(
                story_repo.clone(),
                chapter_repo.clone(),
            ),
            reorder_chapters_handler: ReorderChaptersHandler::new(
                story_repo.clone(),
                chapter_repo.clone(),
            ),
            add_to_library_handler: AddToLibraryHandler::new(library_repo.clone()),
            remove_from_library_handler: RemoveFromLibraryHandler::new(library_repo.clone()),
            update_library_status_handler: UpdateLibraryStatusHandler::new(library_repo.clone()),
            clear_library_section_handler: ClearLibrarySectionHandler::new(library_repo.clone()),
            move_library_section_handler: MoveLibrarySectionHandler::new(library_repo.clone()),

            // Query handlers
            list_stories_handler: ListStoriesHandler::new(story_repo.clone()),
            get_story_handler: GetStoryHandler::new(story_repo.clone()),
            list_stories_by_author_handler: ListStoriesByAuthorHandler::new(story_repo.clone()),
            list_stories_by_genre_handler: ListStoriesByGenreHandler::new(story_repo.clone()),
            list_featured_handler: ListFeaturedStoriesHandler::new(story_repo.clone()),
            list_trending_handler: ListTrendingStoriesHandler::new(story_repo.clone()),
            search_stories_handler: SearchStoriesHandler::new(story_repo.clone()),
            get_author_stats_handler: GetAuthorStatsHandler::new(story_repo.clone()),
            list_chapters_handler: ListChaptersHandler::new(chapter_repo.clone()),
            get_chapter_handler: GetChapterHandler::new(chapter_repo.clone()),
            get_chapter_by_number_handler: GetChapterByNumberHandler::new(chapter_repo.clone()),
            get_adjacent_chapter_handler: GetAdjacentChapterHandler::new(chapter_repo.clone()),
            list_library_handler: ListLibraryHandler::new(story_repo.clone(), library_repo.clone()),
            get_library_status_handler: GetLibraryStatusHandler::new(library_repo.clone()),
            get_library_summary_handler: GetLibrarySummaryHandler::new(
                story_repo.clone(),
                library_repo.clone(),
            ),

            // Ports
            story_repo,
            chapter_repo,
            library_repo,
            author,
        }
    }

    /// 由种子数据与书架介质组装
    pub fn from_parts(
        seed: SeedData,
        store: Arc<dyn KeyValueStorePort>,
        library_key: &str,
        latency: SimulatedLatency,
        author: AuthorRef,
    ) -> Self {
        let story_repo = InMemoryStoryRepository::new(seed.stories)
            .with_latency(latency)
            .arc();
        let chapter_repo = InMemoryChapterRepository::new(seed.chapters)
            .with_latency(latency)
            .arc();
        let library_repo = KeyValueLibraryRepository::with_key(store, library_key).arc();

        Self::new(story_repo, chapter_repo, library_repo, author)
    }

    /// 按配置启动：加载种子数据，打开书架数据库
    pub async fn bootstrap(config: &AppConfig) -> Result<Self, BootstrapError> {
        let seed = load_seed(&config.seed).await?;

        // 确保数据目录存在
        if let Some(parent) = Path::new(&config.storage.library_db).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| BootstrapError::DataDir {
                        path: parent.display().to_string(),
                        message: e.to_string(),
                    })?;
            }
        }
        let store = SledKeyValueStore::open(&config.storage.library_db)?.arc();

        let latency = SimulatedLatency::new(config.latency.enabled, config.latency.scale);
        let author = AuthorRef::new(config.author.id.clone(), config.author.name.clone());

        tracing::info!(
            author_id = %author.id,
            latency_enabled = latency.is_enabled(),
            "Application state initialized"
        );

        Ok(Self::from_parts(
            seed,
            store,
            &config.storage.library_key,
            latency,
            author,
        ))
    }

    /// 内存介质 + 内置种子数据（测试与演示用）
    pub fn in_memory() -> Result<Self, BootstrapError> {
        Ok(Self::from_parts(
            SeedData::embedded()?,
            InMemoryKeyValueStore::new().arc(),
            crate::infrastructure::persistence::DEFAULT_LIBRARY_KEY,
            SimulatedLatency::disabled(),
            AuthorRef::new("current-user", "Current User"),
        ))
    }
}
