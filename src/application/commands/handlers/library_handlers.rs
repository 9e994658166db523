//! Library Command Handlers

use std::sync::Arc;

use crate::application::commands::{
    AddToLibrary, ClearLibrarySection, MoveLibrarySection, RemoveFromLibrary, UpdateLibraryStatus,
};
use crate::application::error::ApplicationError;
use crate::application::ports::LibraryRepositoryPort;
use crate::domain::library::{LibraryEntry, ReadingStatus};

/// 解析调用方传入的阅读状态
pub(crate) fn parse_reading_status(value: &str) -> Result<ReadingStatus, ApplicationError> {
    ReadingStatus::from_str(value).ok_or_else(|| {
        ApplicationError::validation(format!(
            "Invalid library status '{}', expected one of: {}",
            value,
            ReadingStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

/// AddToLibrary Handler
///
/// 已在书架中的作品会被替换为新条目
pub struct AddToLibraryHandler {
    library_repo: Arc<dyn LibraryRepositoryPort>,
}

impl AddToLibraryHandler {
    pub fn new(library_repo: Arc<dyn LibraryRepositoryPort>) -> Self {
        Self { library_repo }
    }

    pub async fn handle(&self, command: AddToLibrary) -> Result<LibraryEntry, ApplicationError> {
        let status = match command.status.as_deref() {
            Some(value) => parse_reading_status(value)?,
            None => ReadingStatus::default(),
        };

        let entry = self.library_repo.add(command.story_id, status).await?;

        tracing::info!(
            story_id = %entry.story_id,
            status = %entry.status,
            "Story added to library"
        );

        Ok(entry)
    }
}

/// RemoveFromLibrary Handler
///
/// 幂等：条目不存在时返回 false
pub struct RemoveFromLibraryHandler {
    library_repo: Arc<dyn LibraryRepositoryPort>,
}

impl RemoveFromLibraryHandler {
    pub fn new(library_repo: Arc<dyn LibraryRepositoryPort>) -> Self {
        Self { library_repo }
    }

    pub async fn handle(&self, command: RemoveFromLibrary) -> Result<bool, ApplicationError> {
        let removed = self.library_repo.remove(command.story_id).await?;

        if removed {
            tracing::info!(story_id = %command.story_id, "Story removed from library");
        } else {
            tracing::debug!(story_id = %command.story_id, "Story was not in library");
        }

        Ok(removed)
    }
}

/// UpdateLibraryStatus Handler
pub struct UpdateLibraryStatusHandler {
    library_repo: Arc<dyn LibraryRepositoryPort>,
}

impl UpdateLibraryStatusHandler {
    pub fn new(library_repo: Arc<dyn LibraryRepositoryPort>) -> Self {
        Self { library_repo }
    }

    pub async fn handle(
        &self,
        command: UpdateLibraryStatus,
    ) -> Result<LibraryEntry, ApplicationError> {
        let status = parse_reading_status(&command.status)?;

        let entry = self
            .library_repo
            .update_status(command.story_id, status)
            .await?
            .ok_or_else(|| ApplicationError::not_found("LibraryEntry", command.story_id.value()))?;

        tracing::info!(
            story_id = %entry.story_id,
            status = %entry.status,
            "Library status updated"
        );

        Ok(entry)
    }
}

/// ClearLibrarySection Handler
pub struct ClearLibrarySectionHandler {
    library_repo: Arc<dyn LibraryRepositoryPort>,
}

impl ClearLibrarySectionHandler {
    pub fn new(library_repo: Arc<dyn LibraryRepositoryPort>) -> Self {
        Self { library_repo }
    }

    pub async fn handle(&self, command: ClearLibrarySection) -> Result<usize, ApplicationError> {
        let status = parse_reading_status(&command.status)?;
        let removed = self.library_repo.remove_by_status(status).await?;

        tracing::info!(status = %status, removed, "Library section cleared");

        Ok(removed)
    }
}

/// MoveLibrarySection Handler
pub struct MoveLibrarySectionHandler {
    library_repo: Arc<dyn LibraryRepositoryPort>,
}

impl MoveLibrarySectionHandler {
    pub fn new(library_repo: Arc<dyn LibraryRepositoryPort>) -> Self {
        Self { library_repo }
    }

    pub async fn handle(&self, command: MoveLibrarySection) -> Result<usize, ApplicationError> {
        let from = parse_reading_status(&command.from)?;
        let to = parse_reading_status(&command.to)?;
        let moved = self.library_repo.move_status(from, to).await?;

        tracing::info!(from = %from, to = %to, moved, "Library section moved");

        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::StoryId;
    use crate::infrastructure::memory::InMemoryKeyValueStore;
    use crate::infrastructure::persistence::KeyValueLibraryRepository;

    fn library() -> Arc<KeyValueLibraryRepository> {
        KeyValueLibraryRepository::new(InMemoryKeyValueStore::new().arc()).arc()
    }

    fn add(story_id: u64, status: Option<&str>) -> AddToLibrary {
        AddToLibrary {
            story_id: StoryId::new(story_id),
            status: status.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_add_defaults_to_want_to_read() {
        let repo = library();
        let entry = AddToLibraryHandler::new(repo.clone())
            .handle(add(1, None))
            .await
            .unwrap();

        assert_eq!(entry.status, ReadingStatus::WantToRead);
        assert_eq!(
            repo.get_status(StoryId::new(1)).await,
            Some(ReadingStatus::WantToRead)
        );
    }

    #[tokio::test]
    async fn test_add_rejects_unknown_status() {
        let repo = library();
        let err = AddToLibraryHandler::new(repo.clone())
            .handle(add(1, Some("abandoned")))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert!(repo.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_then_remove_round_trip() {
        let repo = library();
        AddToLibraryHandler::new(repo.clone())
            .handle(add(7, Some("currently-reading")))
            .await
            .unwrap();

        let handler = RemoveFromLibraryHandler::new(repo.clone());
        let command = RemoveFromLibrary {
            story_id: StoryId::new(7),
        };
        assert!(handler.handle(command.clone()).await.unwrap());
        assert!(!handler.handle(command).await.unwrap());
        assert!(repo.get_status(StoryId::new(7)).await.is_none());
    }

    #[tokio::test]
    async fn test_update_status() {
        let repo = library();
        let handler = UpdateLibraryStatusHandler::new(repo.clone());

        let err = handler
            .handle(UpdateLibraryStatus {
                story_id: StoryId::new(2),
                status: "completed".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        AddToLibraryHandler::new(repo.clone())
            .handle(add(2, None))
            .await
            .unwrap();

        let err = handler
            .handle(UpdateLibraryStatus {
                story_id: StoryId::new(2),
                status: "finished".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let entry = handler
            .handle(UpdateLibraryStatus {
                story_id: StoryId::new(2),
                status: "completed".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(entry.status, ReadingStatus::Completed);
    }

    #[tokio::test]
    async fn test_section_commands() {
        let repo = library();
        let add_handler = AddToLibraryHandler::new(repo.clone());
        add_handler.handle(add(1, None)).await.unwrap();
        add_handler.handle(add(2, None)).await.unwrap();
        add_handler.handle(add(3, Some("completed"))).await.unwrap();

        let moved = MoveLibrarySectionHandler::new(repo.clone())
            .handle(MoveLibrarySection {
                from: "want-to-read".to_string(),
                to: "currently-reading".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(moved, 2);

        let cleared = ClearLibrarySectionHandler::new(repo.clone())
            .handle(ClearLibrarySection {
                status: "completed".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(cleared, 1);

        let statuses: Vec<_> = repo.entries().await.into_iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![ReadingStatus::CurrentlyReading, ReadingStatus::CurrentlyReading]
        );
    }
}
