use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::Article;
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Article repository.
///
/// `save` inserts articles without an id and otherwise performs an
/// optimistic-concurrency update: the write only succeeds when the stored
/// version equals the article's version, and fails with
/// [`RepoError::VersionConflict`] otherwise. A successful write returns the
/// article with its new version.
#[async_trait]
pub trait ArticleRepository: BaseRepository<Article, i64> {
    /// All articles waiting for automatic publication.
    async fn find_all_scheduled(&self) -> Result<Vec<Article>, RepoError>;

    /// Earliest publication timestamp among scheduled articles.
    async fn find_next_scheduled_publication_time(
        &self,
    ) -> Result<Option<DateTime<Utc>>, RepoError>;

    /// Scheduled articles whose publication timestamp is at or before `now`.
    async fn find_due_for_publication(&self, now: DateTime<Utc>)
    -> Result<Vec<Article>, RepoError>;
}
