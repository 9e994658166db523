//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（作品、章节、书架仓储与键值介质）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Story commands
    ArchiveStory,
    CreateStory,
    DeleteStory,
    IncrementViews,
    PublishStory,
    UnpublishStory,
    UpdateStory,
    // Chapter commands
    CreateChapter,
    DeleteChapter,
    ReorderChapters,
    UpdateChapter,
    // Library commands
    AddToLibrary,
    ClearLibrarySection,
    MoveLibrarySection,
    RemoveFromLibrary,
    UpdateLibraryStatus,
    // Handlers
    handlers::{
        AddToLibraryHandler, ArchiveStoryHandler, ClearLibrarySectionHandler,
        CreateChapterHandler, CreateStoryHandler, DeleteChapterHandler, DeleteStoryHandler,
        IncrementViewsHandler, MoveLibrarySectionHandler, PublishStoryHandler,
        RemoveFromLibraryHandler, ReorderChaptersHandler, UnpublishStoryHandler,
        UpdateChapterHandler, UpdateLibraryStatusHandler, UpdateStoryHandler,
    },
};

pub use error::{ApplicationError, ErrorKind};

pub use ports::{
    // Repositories
    ChapterRepositoryPort,
    LibraryRepositoryPort,
    RepositoryError,
    StoryRepositoryPort,
    FEATURED_LIMIT,
    TRENDING_LIMIT,
    // Key-value medium
    KeyValueError,
    KeyValueStorePort,
};

pub use queries::{
    // Story queries
    GetAuthorStats,
    GetStory,
    ListFeaturedStories,
    ListStories,
    ListStoriesByAuthor,
    ListStoriesByGenre,
    ListTrendingStories,
    SearchStories,
    // Chapter queries
    Direction,
    GetAdjacentChapter,
    GetChapter,
    GetChapterByNumber,
    ListChapters,
    // Library queries
    GetLibraryStatus,
    GetLibrarySummary,
    ListLibrary,
    // Handlers
    handlers::{
        AuthorStats, GetAdjacentChapterHandler, GetAuthorStatsHandler, GetChapterByNumberHandler,
        GetChapterHandler, GetLibraryStatusHandler, GetLibrarySummaryHandler, GetStoryHandler,
        LibraryStory, LibrarySummary, ListChaptersHandler, ListFeaturedStoriesHandler,
        ListLibraryHandler, ListStoriesByAuthorHandler, ListStoriesByGenreHandler,
        ListStoriesHandler, ListTrendingStoriesHandler, SearchStoriesHandler,
    },
};
